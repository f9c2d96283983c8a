//! Backend seams: [`Connector`] opens connections, [`MessageStore`] is one open connection.
//!
//! [`crate::ConnectionSupervisor`] owns the connector and hands out store handles;
//! [`crate::StorageAdapter`] runs domain operations on them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{MessageKey, MessageRecord};

/// A live connection to the message table. Cloning shares the connection.
#[async_trait]
pub trait MessageStore: Clone + Send + Sync + 'static {
    /// Writes a new row with `updated_at` unset. Duplicate keys are left to the backend.
    async fn insert(&self, record: &MessageRecord) -> Result<()>;
    /// Sets `content` and `updated_at` on every row matching `key`; returns rows affected.
    async fn update_content(
        &self,
        key: &MessageKey,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64>;
    /// First inserted row for `key`.
    async fn find(&self, key: &MessageKey) -> Result<Option<MessageRecord>>;
    /// Latest `limit` rows of one channel, newest first.
    async fn recent_in_channel(
        &self,
        platform: &str,
        channel_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageRecord>>;
    async fn close(&self);
}

/// Opens connections for the supervisor. Called once at startup and on every reconnection attempt.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: MessageStore;

    async fn connect(&self) -> Result<Self::Connection>;
}
