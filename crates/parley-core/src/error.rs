//! Domain-level error types.

use thiserror::Error;

/// Stable error kinds exposed to callers.
///
/// The codes mirror the callable-function status codes the first clients
/// were written against, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Conflict,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::NotFound => "not-found",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::Conflict => "aborted",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Must be logged in")]
    Unauthenticated,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Not authorized to {action}")]
    PermissionDenied { action: &'static str },

    #[error("Write abandoned after {attempts} conflicting attempts")]
    Conflict { attempts: u32 },

    #[error("Store unavailable during {operation}")]
    Unavailable { operation: &'static str },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthenticated => ErrorKind::Unauthenticated,
            DomainError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Unavailable { .. } => ErrorKind::Unavailable,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn post_not_found(id: &str) -> Self {
        DomainError::NotFound {
            entity_type: "Post",
            id: id.to_string(),
        }
    }

    pub(crate) fn comment_not_found(id: &str) -> Self {
        DomainError::NotFound {
            entity_type: "Comment",
            id: id.to_string(),
        }
    }
}

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Document not found")]
    NotFound,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("Malformed document: {0}")]
    Malformed(String),
}
