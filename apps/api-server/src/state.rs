//! Application state - shared across all handlers.

use std::sync::Arc;

#[cfg(feature = "postgres")]
use anyhow::Context;

use parley_core::ports::DocumentStore;
use parley_core::{AppendStrategy, DiscussionService};
use parley_infra::{DatabaseConfig, DatabaseConnections, InMemoryDocumentStore};

#[cfg(feature = "postgres")]
use parley_infra::PostgresDocumentStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub discussion: Arc<DiscussionService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// The in-memory store is used only when no database is configured. A
    /// configured database that cannot be reached is a startup error.
    pub async fn new(
        db_config: Option<&DatabaseConfig>,
        strategy: AppendStrategy,
    ) -> anyhow::Result<Self> {
        let (store, db) = Self::document_store(db_config).await?;
        tracing::info!(?strategy, "Application state initialized");
        Ok(Self::with_store(store, strategy, db))
    }

    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        strategy: AppendStrategy,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        Self {
            discussion: Arc::new(DiscussionService::new(store, strategy)),
            db,
        }
    }

    #[cfg(feature = "postgres")]
    async fn document_store(
        db_config: Option<&DatabaseConfig>,
    ) -> anyhow::Result<(Arc<dyn DocumentStore>, Option<Arc<DatabaseConnections>>)> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory document store.");
            return Ok((Arc::new(InMemoryDocumentStore::new()), None));
        };

        let connections = DatabaseConnections::init(config)
            .await
            .context("failed to connect to the document database")?;
        let conn = Arc::new(connections);
        let store = Arc::new(PostgresDocumentStore::new(conn.main.clone()));
        Ok((store, Some(conn)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn document_store(
        db_config: Option<&DatabaseConfig>,
    ) -> anyhow::Result<(Arc<dyn DocumentStore>, Option<Arc<DatabaseConnections>>)> {
        if db_config.is_some() {
            anyhow::bail!("DATABASE_URL is set but this build has no postgres support");
        }
        tracing::info!("Running without postgres feature - using in-memory document store");
        Ok((Arc::new(InMemoryDocumentStore::new()), None))
    }
}
