//! Storage adapter: the two domain writes (`insert`, `upsert_content`) over one supervised connection.
//!
//! Callers never see connection state. Every failure is returned to the caller for logging and
//! handed to the [`ConnectionSupervisor`], which decides whether to reconnect. Nothing is retried
//! or buffered here.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::models::{MessageKey, MessageRecord};
use crate::retry::RetryPolicy;
use crate::sqlite_store::SqliteConnector;
use crate::store::{Connector, MessageStore};
use crate::supervisor::{ConnectionState, ConnectionSupervisor};

pub struct StorageAdapter<C: Connector = SqliteConnector> {
    supervisor: Arc<ConnectionSupervisor<C>>,
}

impl<C: Connector> Clone for StorageAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            supervisor: Arc::clone(&self.supervisor),
        }
    }
}

impl StorageAdapter<SqliteConnector> {
    /// Validates `config`, then connects to SQLite (retrying per the configured policy).
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        Self::connect(SqliteConnector::from_config(config), config.retry_policy()).await
    }
}

impl<C: Connector> StorageAdapter<C> {
    /// Returns only after the first successful connect. Fails if a bounded policy runs out.
    pub async fn connect(connector: C, policy: RetryPolicy) -> Result<Self> {
        let supervisor = ConnectionSupervisor::new(connector, policy);
        supervisor.connect().await?;
        Ok(Self { supervisor })
    }

    /// Writes a new record. `record.updated_at` is ignored; new rows are never edited.
    pub async fn insert(&self, record: &MessageRecord) -> Result<()> {
        self.run(|store| async move { store.insert(record).await })
            .await
    }

    /// Sets `content` and `updated_at` on the record for `key`. A missing record is not an
    /// error: nothing is created and `Ok(0)` is returned.
    pub async fn upsert_content(
        &self,
        key: &MessageKey,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        let affected = self
            .run(|store| async move { store.update_content(key, content, updated_at).await })
            .await?;
        if affected == 0 {
            debug!(key = %key, "Update matched no stored message");
        }
        Ok(affected)
    }

    pub async fn find(&self, key: &MessageKey) -> Result<Option<MessageRecord>> {
        self.run(|store| async move { store.find(key).await }).await
    }

    pub async fn recent_in_channel(
        &self,
        platform: &str,
        channel_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageRecord>> {
        self.run(|store| async move { store.recent_in_channel(platform, channel_id, limit).await })
            .await
    }

    pub fn state(&self) -> ConnectionState {
        self.supervisor.state()
    }

    /// Resolves once the connection reaches `target`.
    pub async fn wait_for(&self, target: ConnectionState) {
        self.supervisor.wait_for(target).await
    }

    pub fn supervisor(&self) -> &Arc<ConnectionSupervisor<C>> {
        &self.supervisor
    }

    /// Closes the connection and stops reconnecting. Later operations fail with `ConnectionFailure`.
    pub async fn shutdown(&self) {
        self.supervisor.shutdown().await
    }

    /// Runs `op` on the current connection; on failure, reports to the supervisor and returns the error.
    async fn run<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(C::Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = match self.supervisor.handle().await {
            Ok(store) => op(store).await,
            Err(e) => Err(e),
        };
        outcome.map_err(|e| {
            self.supervisor.report_failure(&e);
            e
        })
    }
}
