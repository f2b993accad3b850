//! Database connection management and the Postgres document store.

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_store;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use postgres_store::PostgresDocumentStore;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
