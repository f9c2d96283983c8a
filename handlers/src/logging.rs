//! Handler that logs each event; never fails.

use async_trait::async_trait;
use capture_core::{MessageCreated, MessageEventHandler, MessageUpdated};
use tracing::{debug, info, instrument};

pub struct LoggingHandler;

#[async_trait]
impl MessageEventHandler for LoggingHandler {
    #[instrument(skip(self, event))]
    async fn on_message_created(&self, event: &MessageCreated) {
        info!(
            platform = %event.platform,
            channel_id = %event.channel_id,
            message_id = %event.message_id,
            user_id = %event.user_id,
            username = %event.username,
            "Received message"
        );
        debug!(content = %event.content, "Message content");
    }

    #[instrument(skip(self, event))]
    async fn on_message_updated(&self, event: &MessageUpdated) {
        info!(
            platform = %event.platform,
            channel_id = %event.channel_id,
            message_id = %event.message_id,
            has_timestamp = event.updated_timestamp.is_some(),
            "Received message edit"
        );
    }
}
