//! Identity port.
//!
//! Parley never issues credentials for real users; it only validates the
//! bearer tokens an identity provider hands out.

use crate::domain::Caller;

/// Claims carried by a validated token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Opaque user id assigned by the identity provider.
    pub user_id: String,
    pub email: String,
}

impl From<TokenClaims> for Caller {
    fn from(claims: TokenClaims) -> Self {
        Caller::new(claims.user_id, claims.email)
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Sign a token for a user (tests and local tooling).
    fn generate_token(&self, user_id: &str, email: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly generated tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Signing failed: {0}")]
    Signing(String),
}
