use serde::{Deserialize, Serialize};

use super::{Authored, Comment};

/// Post entity - a short moderated text with its flat comment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_email: String,
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Authored for Post {
    fn author_id(&self) -> &str {
        &self.author_id
    }
}
