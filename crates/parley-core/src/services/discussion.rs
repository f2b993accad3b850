//! The discussion service: the one place each operation is implemented.

use std::sync::Arc;

use crate::domain::{Caller, Comment, Post};
use crate::error::DomainError;
use crate::ports::DocumentStore;

use super::comments::{AppendStrategy, CommentAppendEngine, CommentWriter};
use super::guard::{ensure_author, require_caller, require_text};
use super::post_store::PostStore;
use super::{moderation, query, store_failure};

/// Posts and comments, moderated and ownership-checked.
///
/// Construct once at startup around the shared store handle and share it
/// between request handlers.
pub struct DiscussionService {
    posts: Arc<PostStore>,
    comments: CommentAppendEngine,
}

impl DiscussionService {
    pub fn new(store: Arc<dyn DocumentStore>, strategy: AppendStrategy) -> Self {
        let posts = Arc::new(PostStore::new(store));
        let writer = strategy.writer(posts.clone());
        Self::from_parts(posts, writer)
    }

    /// Use a custom comment writer.
    pub fn with_writer(store: Arc<dyn DocumentStore>, writer: Arc<dyn CommentWriter>) -> Self {
        Self::from_parts(Arc::new(PostStore::new(store)), writer)
    }

    fn from_parts(posts: Arc<PostStore>, writer: Arc<dyn CommentWriter>) -> Self {
        let comments = CommentAppendEngine::new(posts.clone(), writer);
        Self { posts, comments }
    }

    pub async fn create_post(
        &self,
        caller: Option<&Caller>,
        content: &str,
    ) -> Result<Post, DomainError> {
        let caller = require_caller(caller)?;
        require_text("content", content)?;

        let post = self
            .posts
            .create(caller, moderation::filter(content))
            .await
            .map_err(|e| store_failure("create_post", "<new>", e))?;

        tracing::info!(post_id = %post.id, user_id = %caller.user_id, "Post created");
        Ok(post)
    }

    /// Replace a post's content. Returns the moderated content as stored.
    pub async fn edit_post(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
        content: &str,
    ) -> Result<String, DomainError> {
        let caller = require_caller(caller)?;
        require_text("postId", post_id)?;
        require_text("content", content)?;

        let post = self.load(post_id, "edit_post").await?;
        ensure_author(&post, caller, "edit this post")?;

        let filtered = moderation::filter(content);
        self.posts
            .update_content(post_id, &filtered)
            .await
            .map_err(|e| store_failure("edit_post", post_id, e))?;

        tracing::info!(post_id, "Post edited");
        Ok(filtered)
    }

    pub async fn delete_post(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
    ) -> Result<(), DomainError> {
        let caller = require_caller(caller)?;
        require_text("postId", post_id)?;

        let post = self.load(post_id, "delete_post").await?;
        ensure_author(&post, caller, "delete this post")?;

        self.posts
            .delete(post_id)
            .await
            .map_err(|e| store_failure("delete_post", post_id, e))?;

        tracing::info!(post_id, "Post deleted");
        Ok(())
    }

    pub async fn add_comment(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, DomainError> {
        self.comments.add_comment(caller, post_id, content).await
    }

    pub async fn delete_comment(
        &self,
        caller: Option<&Caller>,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), DomainError> {
        self.comments
            .delete_comment(caller, post_id, comment_id)
            .await
    }

    /// All posts with their comments, newest post first.
    pub async fn get_posts(&self, caller: Option<&Caller>) -> Result<Vec<Post>, DomainError> {
        require_caller(caller)?;

        let snapshots = self.posts.list_newest_first().await.map_err(|e| {
            tracing::error!(operation = "get_posts", error = %e, "Failed to list posts");
            DomainError::Unavailable {
                operation: "get_posts",
            }
        })?;

        let mut posts: Vec<Post> = snapshots.iter().map(query::normalize_post).collect();
        query::sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn load(&self, post_id: &str, operation: &'static str) -> Result<Post, DomainError> {
        self.posts
            .find(post_id)
            .await
            .map_err(|e| store_failure(operation, post_id, e))?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }
}
