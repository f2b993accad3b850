//! Read-side normalization of stored posts.
//!
//! Records written by older clients are loose: fields go missing, come back
//! as numbers, use the legacy `userId`/`userEmail` names, or carry native
//! store timestamps instead of ISO strings. Everything leaving the service is
//! coerced into the canonical [`Post`] / [`Comment`] shape here.

use serde_json::Value;

use crate::domain::timestamp;
use crate::domain::{Comment, Post};
use crate::ports::{Document, DocumentSnapshot};

use super::post_store::{CREATED_AT_FIELD, comment_elements};

pub fn normalize_post(snapshot: &DocumentSnapshot) -> Post {
    let data = &snapshot.data;
    Post {
        id: snapshot.id.clone(),
        content: text(data.get("content")),
        author_id: author_field(data, "authorId", "userId"),
        author_email: author_field(data, "authorEmail", "userEmail"),
        created_at: iso_timestamp(data.get(CREATED_AT_FIELD)).unwrap_or_default(),
        comments: comment_elements(data).iter().map(normalize_comment).collect(),
    }
}

pub fn normalize_comment(raw: &Value) -> Comment {
    let empty = Document::new();
    let data = raw.as_object().unwrap_or(&empty);

    let created_at = iso_timestamp(data.get(CREATED_AT_FIELD)).unwrap_or_else(|| {
        // Lossy: the real creation time is unknown.
        tracing::debug!(comment = %raw, "Comment without usable createdAt, substituting now");
        timestamp::now_iso()
    });

    Comment {
        id: text(data.get("id")),
        content: text(data.get("content")),
        author_id: author_field(data, "authorId", "userId"),
        author_email: author_field(data, "authorEmail", "userEmail"),
        created_at,
    }
}

/// Order posts newest first. Stable, so equal timestamps keep store order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Coerce a scalar to text; absent and null become `""`.
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn author_field(data: &Document, field: &str, legacy: &str) -> String {
    match data.get(field) {
        None | Some(Value::Null) => text(data.get(legacy)),
        present => text(present),
    }
}

/// Accept an ISO-8601 string or a native `{_seconds, _nanoseconds}` object.
///
/// Parseable strings are canonicalized; unparseable ones are kept verbatim.
fn iso_timestamp(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(raw) => Some(timestamp::canonicalize(raw).unwrap_or_else(|| raw.clone())),
        Value::Object(fields) => {
            let seconds = fields
                .get("_seconds")
                .or_else(|| fields.get("seconds"))?
                .as_i64()?;
            let nanos = fields
                .get("_nanoseconds")
                .or_else(|| fields.get("nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            timestamp::from_epoch(seconds, nanos)
        }
        _ => None,
    }
}
