//! # Parley Core
//!
//! The domain layer of the Parley discussion backend.
//! Posts, comments, the moderation filter and the comment append engine live
//! here; storage and identity are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, ErrorKind, StoreError};
pub use services::{AppendStrategy, DiscussionService};
