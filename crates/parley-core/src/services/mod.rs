//! Application services - every entry point goes through these.

pub mod comments;
mod discussion;
pub mod guard;
pub mod moderation;
pub mod post_store;
pub mod query;

pub use comments::{
    AppendStrategy, AtomicUnionWriter, CommentAppendEngine, CommentWriter, OptimisticWriter,
};
pub use discussion::DiscussionService;
pub use post_store::PostStore;

use crate::error::{DomainError, StoreError};

/// Map a store failure at an operation boundary, logging what the caller
/// will not see.
pub(crate) fn store_failure(
    operation: &'static str,
    post_id: &str,
    err: StoreError,
) -> DomainError {
    match err {
        StoreError::NotFound => DomainError::post_not_found(post_id),
        StoreError::Malformed(detail) => {
            tracing::error!(operation, post_id, %detail, "Malformed post document");
            DomainError::Internal(format!("malformed post {post_id}"))
        }
        other => {
            tracing::error!(operation, post_id, error = %other, "Store operation failed");
            DomainError::Unavailable { operation }
        }
    }
}
