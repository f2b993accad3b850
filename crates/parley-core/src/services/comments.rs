//! Comment append engine.
//!
//! A post's comments are one array inside the post document, and many
//! clients append to it at once. All comment mutation goes through a
//! [`CommentWriter`], so the way atomicity is obtained can be swapped without
//! touching callers:
//!
//! - [`AtomicUnionWriter`] hands the append to the store as a single
//!   `array_union`, which the store applies server-side. There is no
//!   read-modify-write window at all. This is the default.
//! - [`OptimisticWriter`] reads the post with its version, edits the array in
//!   memory and writes it back only if the version is unchanged, retrying the
//!   whole cycle on conflict up to a fixed number of attempts.
//!
//! An unconditional read-modify-write is never used: two concurrent appends
//! would both read the same array and the later write would drop the other
//! comment.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;

use crate::domain::{Caller, Comment};
use crate::error::{DomainError, StoreError};
use crate::ports::Document;

use super::guard::{ensure_author, require_caller, require_text};
use super::moderation;
use super::post_store::{
    COMMENTS_FIELD, POSTS_COLLECTION, PostStore, StoredComment, comment_element,
    comment_elements, find_comment,
};
use super::store_failure;

/// Which [`CommentWriter`] the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendStrategy {
    #[default]
    AtomicUnion,
    Optimistic {
        max_attempts: u32,
    },
}

impl AppendStrategy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        match self {
            AppendStrategy::AtomicUnion => AppendStrategy::AtomicUnion,
            AppendStrategy::Optimistic { .. } => AppendStrategy::Optimistic {
                max_attempts: max_attempts.max(1),
            },
        }
    }

    pub fn writer(self, posts: Arc<PostStore>) -> Arc<dyn CommentWriter> {
        match self {
            AppendStrategy::AtomicUnion => Arc::new(AtomicUnionWriter::new(posts)),
            AppendStrategy::Optimistic { max_attempts } => {
                Arc::new(OptimisticWriter::new(posts, max_attempts))
            }
        }
    }
}

impl FromStr for AppendStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic-union" | "atomic" | "union" => Ok(AppendStrategy::AtomicUnion),
            "optimistic" | "read-modify-write" => Ok(AppendStrategy::Optimistic {
                max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            }),
            other => Err(format!("unknown comment append strategy: {other}")),
        }
    }
}

/// The single seam through which comments are added to or removed from a post.
#[async_trait]
pub trait CommentWriter: Send + Sync {
    /// Durably append `comment` to the post. NotFound if the post is absent.
    async fn append(&self, post_id: &str, comment: &Comment) -> Result<(), DomainError>;

    /// Durably remove a previously read comment from the post.
    async fn remove(&self, post_id: &str, target: &StoredComment) -> Result<(), DomainError>;
}

/// Appends with the store's atomic array union.
pub struct AtomicUnionWriter {
    posts: Arc<PostStore>,
}

impl AtomicUnionWriter {
    pub fn new(posts: Arc<PostStore>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl CommentWriter for AtomicUnionWriter {
    async fn append(&self, post_id: &str, comment: &Comment) -> Result<(), DomainError> {
        let element = comment_element(comment).map_err(|e| DomainError::Internal(e.to_string()))?;
        self.posts
            .documents()
            .array_union(POSTS_COLLECTION, post_id, COMMENTS_FIELD, element)
            .await
            .map_err(|e| store_failure("add_comment", post_id, e))
    }

    async fn remove(&self, post_id: &str, target: &StoredComment) -> Result<(), DomainError> {
        self.posts
            .documents()
            .array_remove(
                POSTS_COLLECTION,
                post_id,
                COMMENTS_FIELD,
                target.raw.clone(),
            )
            .await
            .map_err(|e| store_failure("delete_comment", post_id, e))
    }
}

/// Read-modify-write guarded by the document version, with bounded retries.
pub struct OptimisticWriter {
    posts: Arc<PostStore>,
    max_attempts: u32,
    base_backoff: Duration,
}

impl OptimisticWriter {
    pub fn new(posts: Arc<PostStore>, max_attempts: u32) -> Self {
        Self {
            posts,
            max_attempts: max_attempts.max(1),
            base_backoff: Duration::from_millis(10),
        }
    }

    /// Base delay before the second attempt; doubled per attempt, jittered.
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.base_backoff = base;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self.base_backoff.saturating_mul(1 << (attempt - 1).min(6));
        let jitter = rand::thread_rng().gen_range(0.7..1.3);
        exponential.mul_f64(jitter)
    }

    async fn rewrite<F>(
        &self,
        post_id: &str,
        operation: &'static str,
        mut edit: F,
    ) -> Result<(), DomainError>
    where
        F: FnMut(&mut Vec<Value>) + Send,
    {
        for attempt in 1..=self.max_attempts {
            let snapshot = self
                .posts
                .snapshot(post_id)
                .await
                .map_err(|e| store_failure(operation, post_id, e))?
                .ok_or_else(|| DomainError::post_not_found(post_id))?;

            let mut comments = comment_elements(&snapshot.data).to_vec();
            edit(&mut comments);

            let mut patch = Document::new();
            patch.insert(COMMENTS_FIELD.into(), Value::Array(comments));

            match self
                .posts
                .documents()
                .update_if_version(POSTS_COLLECTION, post_id, patch, snapshot.version)
                .await
            {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionMismatch { expected, found }) => {
                    tracing::debug!(
                        post_id,
                        operation,
                        attempt,
                        expected,
                        found,
                        "Concurrent write detected, retrying"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff(attempt)).await;
                    }
                }
                Err(e) => return Err(store_failure(operation, post_id, e)),
            }
        }

        tracing::warn!(
            post_id,
            operation,
            attempts = self.max_attempts,
            "Giving up after repeated version conflicts"
        );
        Err(DomainError::Conflict {
            attempts: self.max_attempts,
        })
    }
}

#[async_trait]
impl CommentWriter for OptimisticWriter {
    async fn append(&self, post_id: &str, comment: &Comment) -> Result<(), DomainError> {
        let element = comment_element(comment).map_err(|e| DomainError::Internal(e.to_string()))?;
        self.rewrite(post_id, "add_comment", |comments| {
            if !comments.contains(&element) {
                comments.push(element.clone());
            }
        })
        .await
    }

    async fn remove(&self, post_id: &str, target: &StoredComment) -> Result<(), DomainError> {
        self.rewrite(post_id, "delete_comment", |comments| {
            comments.retain(|c| c != &target.raw);
        })
        .await
    }
}

/// Validates, moderates and stamps comments, then hands them to a writer.
pub struct CommentAppendEngine {
    posts: Arc<PostStore>,
    writer: Arc<dyn CommentWriter>,
}

impl CommentAppendEngine {
    pub fn new(posts: Arc<PostStore>, writer: Arc<dyn CommentWriter>) -> Self {
        Self { posts, writer }
    }

    pub async fn add_comment(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let caller = require_caller(caller)?;
        require_text("postId", post_id)?;
        require_text("content", content)?;

        let comment = Comment::new(
            self.posts.new_comment_id(),
            caller,
            moderation::filter(content),
        );
        self.writer.append(post_id, &comment).await?;

        tracing::info!(
            post_id,
            comment_id = %comment.id,
            user_id = %caller.user_id,
            "Comment added"
        );
        Ok(comment)
    }

    /// Remove a comment; only its author may do so.
    pub async fn delete_comment(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), DomainError> {
        let caller = require_caller(caller)?;
        require_text("postId", post_id)?;
        require_text("commentId", comment_id)?;

        let snapshot = self
            .posts
            .snapshot(post_id)
            .await
            .map_err(|e| store_failure("delete_comment", post_id, e))?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        let target = find_comment(&snapshot, comment_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?;

        ensure_author(&target.comment, caller, "delete this comment")?;
        self.writer.remove(post_id, &target).await?;

        tracing::info!(post_id, comment_id, "Comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(
            "atomic-union".parse::<AppendStrategy>(),
            Ok(AppendStrategy::AtomicUnion)
        );
        assert_eq!(
            "Optimistic".parse::<AppendStrategy>(),
            Ok(AppendStrategy::Optimistic { max_attempts: 5 })
        );
        assert!("yolo".parse::<AppendStrategy>().is_err());
    }

    #[test]
    fn test_max_attempts_only_applies_to_optimistic() {
        assert_eq!(
            AppendStrategy::AtomicUnion.with_max_attempts(9),
            AppendStrategy::AtomicUnion
        );
        assert_eq!(
            AppendStrategy::Optimistic { max_attempts: 5 }.with_max_attempts(0),
            AppendStrategy::Optimistic { max_attempts: 1 }
        );
    }
}
