//! # Parley Infrastructure
//!
//! Concrete implementations of the ports defined in `parley-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL JSONB document store via SeaORM
//! - `auth` - JWT token validation

pub mod database;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, DatabaseConnections};
pub use store::InMemoryDocumentStore;

#[cfg(feature = "postgres")]
pub use database::PostgresDocumentStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};
