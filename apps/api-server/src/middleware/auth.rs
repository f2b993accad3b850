//! Caller identity extraction.
//!
//! Every operation decides for itself that a caller is required, so the
//! extractor never rejects a request. A missing, malformed or expired token
//! simply yields no caller and the operation answers `unauthenticated`.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::sync::Arc;

use parley_core::domain::Caller;
use parley_core::ports::{AuthError, TokenService};

/// The authenticated caller, if the request carried a valid bearer token.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Caller>);

impl OptionalIdentity {
    pub fn caller(&self) -> Option<&Caller> {
        self.0.as_ref()
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Caller, AuthError> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let token = bearer_token(req)?;
    tokens.validate_token(token).map(Caller::from)
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(caller) => ready(Ok(OptionalIdentity(Some(caller)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
