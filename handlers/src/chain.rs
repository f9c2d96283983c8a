//! # Handler chain
//!
//! Delivers each event to every handler in insertion order. Handlers cannot stop the chain;
//! each one is awaited before the next runs.

use std::sync::Arc;

use async_trait::async_trait;
use capture_core::{MessageCreated, MessageEventHandler, MessageUpdated};
use tracing::debug;

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn MessageEventHandler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler (runs after those already added).
    pub fn add_handler(mut self, handler: Arc<dyn MessageEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl MessageEventHandler for HandlerChain {
    async fn on_message_created(&self, event: &MessageCreated) {
        for handler in &self.handlers {
            debug!(
                handler = %std::any::type_name_of_val(handler.as_ref()),
                message_id = %event.message_id,
                "step: created event to handler"
            );
            handler.on_message_created(event).await;
        }
    }

    async fn on_message_updated(&self, event: &MessageUpdated) {
        for handler in &self.handlers {
            debug!(
                handler = %std::any::type_name_of_val(handler.as_ref()),
                message_id = %event.message_id,
                "step: updated event to handler"
            );
            handler.on_message_updated(event).await;
        }
    }
}
