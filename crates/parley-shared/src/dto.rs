//! Data Transfer Objects - request/response bodies for the API.
//!
//! Field names are camelCase on the wire to match stored documents.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/posts`.
///
/// `content` defaults to empty so a missing field is reported as
/// `invalid-argument` by the service rather than as a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: String,
}

/// Body of `PUT /api/posts/{postId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPostRequest {
    #[serde(default)]
    pub content: String,
}

/// Body of `POST /api/posts/{postId}/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_email: String,
    pub created_at: String,
    pub comments: Vec<CommentResponse>,
}

/// Result of an edit: the content as actually stored, after moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPostResponse {
    pub success: bool,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentResponse {
    pub success: bool,
    pub comment: CommentResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_content_deserializes_empty() {
        let req: CreatePostRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.content, "");
    }

    #[test]
    fn test_post_response_uses_camel_case() {
        let body = serde_json::to_value(PostResponse {
            id: "p1".into(),
            content: "hi".into(),
            author_id: "u1".into(),
            author_email: "a@example.com".into(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
            comments: vec![],
        })
        .unwrap();

        assert_eq!(body["authorId"], "u1");
        assert_eq!(body["authorEmail"], "a@example.com");
        assert_eq!(body["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(body.get("author_id").is_none());
    }
}
