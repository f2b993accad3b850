//! Authorization guard and request validation.

use crate::domain::{Authored, Caller};
use crate::error::DomainError;

/// Turn the optional identity of a request into a caller or fail.
pub fn require_caller(caller: Option<&Caller>) -> Result<&Caller, DomainError> {
    caller.ok_or(DomainError::Unauthenticated)
}

/// Reject missing or whitespace-only required fields.
pub fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidArgument(format!("{field} is required")));
    }
    Ok(())
}

/// Only the author of `entity` may perform `action` on it.
pub fn ensure_author<T: Authored>(
    entity: &T,
    caller: &Caller,
    action: &'static str,
) -> Result<(), DomainError> {
    if entity.author_id() != caller.user_id {
        tracing::warn!(
            user_id = %caller.user_id,
            owner_id = %entity.author_id(),
            action,
            "Ownership check failed"
        );
        return Err(DomainError::PermissionDenied { action });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Comment;

    #[test]
    fn test_require_caller() {
        assert!(matches!(
            require_caller(None),
            Err(DomainError::Unauthenticated)
        ));
        let caller = Caller::new("u1", "a@example.com");
        assert_eq!(require_caller(Some(&caller)).unwrap().user_id, "u1");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("content", "hi").is_ok());
        let err = require_text("content", "  \n\t").unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(msg) if msg == "content is required"));
    }

    #[test]
    fn test_ensure_author() {
        let owner = Caller::new("u1", "a@example.com");
        let stranger = Caller::new("u2", "b@example.com");
        let comment = Comment::new("c1".into(), &owner, "hello".into());

        assert!(ensure_author(&comment, &owner, "delete this comment").is_ok());
        assert!(matches!(
            ensure_author(&comment, &stranger, "delete this comment"),
            Err(DomainError::PermissionDenied { .. })
        ));
    }
}
