//! Handler that persists created messages and applies edits through a [`StorageAdapter`].

use std::sync::Arc;

use async_trait::async_trait;
use capture_core::{MessageCreated, MessageEventHandler, MessageUpdated};
use storage::{Connector, MessageKey, MessageRecord, SqliteConnector, StorageAdapter};
use tracing::{debug, error, instrument};

/// Builds the record stored for a created message; a missing guild becomes an empty string.
pub fn record_from_event(event: &MessageCreated) -> MessageRecord {
    MessageRecord::new(
        MessageKey::new(&event.platform, &event.channel_id, &event.message_id),
        event.guild_id.clone().unwrap_or_default(),
        &event.user_id,
        &event.username,
        &event.content,
        event.timestamp,
    )
}

/// Writes every created message and every edit to the adapter. Failures are logged with the
/// message key and swallowed; the adapter takes care of reconnecting.
pub struct PersistenceHandler<C: Connector = SqliteConnector> {
    adapter: Arc<StorageAdapter<C>>,
}

impl<C: Connector> Clone for PersistenceHandler<C> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
        }
    }
}

impl<C: Connector> PersistenceHandler<C> {
    /// Creates a handler that persists through the given adapter.
    pub fn new(adapter: Arc<StorageAdapter<C>>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &Arc<StorageAdapter<C>> {
        &self.adapter
    }
}

#[async_trait]
impl<C: Connector> MessageEventHandler for PersistenceHandler<C> {
    #[instrument(skip(self, event))]
    async fn on_message_created(&self, event: &MessageCreated) {
        let record = record_from_event(event);
        let key = record.key();

        match self.adapter.insert(&record).await {
            Ok(()) => debug!(key = %key, "Message saved"),
            Err(e) => error!(key = %key, error = %e, "Failed to save message"),
        }
    }

    #[instrument(skip(self, event))]
    async fn on_message_updated(&self, event: &MessageUpdated) {
        let key = MessageKey::new(&event.platform, &event.channel_id, &event.message_id);
        let updated_at = event.updated_at_or_now();

        match self
            .adapter
            .upsert_content(&key, &event.content, updated_at)
            .await
        {
            Ok(affected) => debug!(key = %key, affected, "Message edit applied"),
            Err(e) => error!(key = %key, error = %e, "Failed to apply message edit"),
        }
    }
}
