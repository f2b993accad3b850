//! Domain entities - the core business objects.

mod caller;
mod comment;
mod post;
pub mod timestamp;

pub use caller::Caller;
pub use comment::Comment;
pub use post::Post;

/// Anything that records the user who created it.
pub trait Authored {
    fn author_id(&self) -> &str;
}
