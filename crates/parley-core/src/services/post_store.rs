//! Post store adapter - maps posts onto documents in the `posts` collection.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::domain::timestamp;
use crate::domain::{Caller, Comment, Post};
use crate::error::StoreError;
use crate::ports::{Direction, Document, DocumentSnapshot, DocumentStore};

use super::query;

pub const POSTS_COLLECTION: &str = "posts";
pub const COMMENTS_FIELD: &str = "comments";
pub const CREATED_AT_FIELD: &str = "createdAt";
const CONTENT_FIELD: &str = "content";

/// A comment together with the exact JSON element it is stored as.
///
/// Array removal matches whole elements, so deleting a comment needs the
/// stored form rather than a re-serialization of the normalized one.
#[derive(Debug, Clone)]
pub struct StoredComment {
    pub comment: Comment,
    pub raw: Value,
}

/// CRUD over post documents.
pub struct PostStore {
    store: Arc<dyn DocumentStore>,
}

impl PostStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Fresh id for a comment, drawn from the store's id space.
    pub fn new_comment_id(&self) -> String {
        self.store.new_id()
    }

    /// Insert a post owned by `author` with already-moderated `content`.
    pub async fn create(&self, author: &Caller, content: String) -> Result<Post, StoreError> {
        let created_at = timestamp::now_iso();
        let mut data = Document::new();
        data.insert(CONTENT_FIELD.into(), json!(content));
        data.insert("authorId".into(), json!(author.user_id));
        data.insert("authorEmail".into(), json!(author.email));
        data.insert(CREATED_AT_FIELD.into(), json!(created_at));
        data.insert(COMMENTS_FIELD.into(), Value::Array(Vec::new()));

        let id = self.store.add(POSTS_COLLECTION, data).await?;
        tracing::debug!(post_id = %id, "Post document created");

        Ok(Post {
            id,
            content,
            author_id: author.user_id.clone(),
            author_email: author.email.clone(),
            created_at,
            comments: Vec::new(),
        })
    }

    pub async fn snapshot(&self, id: &str) -> Result<Option<DocumentSnapshot>, StoreError> {
        self.store.get(POSTS_COLLECTION, id).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.snapshot(id).await?.as_ref().map(query::normalize_post))
    }

    pub async fn update_content(&self, id: &str, content: &str) -> Result<(), StoreError> {
        let mut patch = Document::new();
        patch.insert(CONTENT_FIELD.into(), json!(content));
        self.store.update(POSTS_COLLECTION, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(POSTS_COLLECTION, id).await
    }

    /// Every post, newest first as far as the store's ordering goes.
    pub async fn list_newest_first(&self) -> Result<Vec<DocumentSnapshot>, StoreError> {
        self.store
            .query_ordered(POSTS_COLLECTION, CREATED_AT_FIELD, Direction::Descending)
            .await
    }
}

/// The stored comment elements of a post document.
pub fn comment_elements(data: &Document) -> &[Value] {
    match data.get(COMMENTS_FIELD) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Locate a comment by id inside a post snapshot.
pub fn find_comment(snapshot: &DocumentSnapshot, comment_id: &str) -> Option<StoredComment> {
    comment_elements(&snapshot.data)
        .iter()
        .map(|raw| StoredComment {
            comment: query::normalize_comment(raw),
            raw: raw.clone(),
        })
        .find(|stored| stored.comment.id == comment_id)
}

/// The JSON element a comment is stored as.
pub fn comment_element(comment: &Comment) -> Result<Value, StoreError> {
    serde_json::to_value(comment).map_err(|e| StoreError::Malformed(e.to_string()))
}
