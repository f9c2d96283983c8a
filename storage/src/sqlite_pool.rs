//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Manages a single SQLite pool; creates DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
    options: SqliteConnectOptions,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path or in-memory).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Initializing SQLite pool");

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Self::with_options(options, is_in_memory(database_url)).await
    }

    /// Creates a pool from already parsed options. Reusing the options of another manager
    /// opens the same database, including the same in-memory one.
    ///
    /// In-memory databases live only as long as a connection to them, so that pool is pinned
    /// to one connection that never idles out.
    pub async fn with_options(
        options: SqliteConnectOptions,
        in_memory: bool,
    ) -> Result<Self, sqlx::Error> {
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options.clone()).await?;

        Ok(Self { pool, options })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn options(&self) -> &SqliteConnectOptions {
        &self.options
    }

    /// Closes every connection; queries on clones of this pool fail with `PoolClosed` afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

pub(crate) fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
