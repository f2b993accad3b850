use serde::{Deserialize, Serialize};

use super::timestamp;
use super::{Authored, Caller};

/// Comment entity - lives only inside its parent post's comment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_email: String,
    pub created_at: String,
}

impl Comment {
    /// Create a comment stamped with the author's identity and the current time.
    ///
    /// `content` is stored as given; callers pass already-moderated text.
    pub fn new(id: String, author: &Caller, content: String) -> Self {
        Self {
            id,
            content,
            author_id: author.user_id.clone(),
            author_email: author.email.clone(),
            created_at: timestamp::now_iso(),
        }
    }
}

impl Authored for Comment {
    fn author_id(&self) -> &str {
        &self.author_id
    }
}
