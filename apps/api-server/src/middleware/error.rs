//! Error handling - RFC 7807 responses carrying the stable error code.

use actix_web::{HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};

use parley_core::{DomainError, ErrorKind};
use parley_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(e) => e.kind(),
            AppError::BadRequest(_) => ErrorKind::InvalidArgument,
        }
    }
}

fn title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Unauthenticated => "Unauthorized",
        ErrorKind::InvalidArgument => "Bad Request",
        ErrorKind::NotFound => "Not Found",
        ErrorKind::PermissionDenied => "Forbidden",
        ErrorKind::Conflict => "Conflict",
        ErrorKind::Unavailable => "Service Unavailable",
        ErrorKind::Internal => "Internal Server Error",
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        let error = match (self, kind) {
            (AppError::BadRequest(detail), _) => ErrorResponse::bad_request(detail),
            // Internal details stay in the logs.
            (_, ErrorKind::Internal) => {
                tracing::error!(error = %self, "Internal error");
                ErrorResponse::internal_error()
            }
            (_, ErrorKind::Unauthenticated) => {
                ErrorResponse::unauthorized().with_detail(self.to_string())
            }
            _ => ErrorResponse::new(self.status_code().as_u16(), title(kind), kind.as_code())
                .with_detail(self.to_string()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Report malformed JSON bodies in the same problem format.
pub fn json_error_handler(
    err: JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError::BadRequest(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
