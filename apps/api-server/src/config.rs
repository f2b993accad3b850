//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use parley_core::AppendStrategy;
use parley_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub comment_strategy: AppendStrategy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
            connect_timeout: Duration::from_secs(parsed("DB_CONNECT_TIMEOUT_SECS").unwrap_or(8)),
        });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            comment_strategy: Self::comment_strategy()?,
        })
    }

    /// COMMENT_APPEND_STRATEGY=atomic-union|optimistic,
    /// COMMENT_APPEND_MAX_ATTEMPTS=<n> (optimistic only).
    fn comment_strategy() -> Result<AppendStrategy> {
        let strategy = match env::var("COMMENT_APPEND_STRATEGY") {
            Ok(raw) => raw
                .parse::<AppendStrategy>()
                .map_err(anyhow::Error::msg)
                .context("invalid COMMENT_APPEND_STRATEGY")?,
            Err(_) => AppendStrategy::default(),
        };

        Ok(match parsed::<u32>("COMMENT_APPEND_MAX_ATTEMPTS") {
            Some(max_attempts) => strategy.with_max_attempts(max_attempts),
            None => strategy,
        })
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
