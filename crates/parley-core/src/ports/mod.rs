//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod document_store;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use document_store::{Direction, Document, DocumentSnapshot, DocumentStore};
