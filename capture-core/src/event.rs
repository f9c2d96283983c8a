//! Chat events delivered by an event bridge, and the handler trait they are dispatched to.
//!
//! Events serialize as camelCase JSON with millisecond epoch timestamps; [`MessageEvent`]
//! tags them with `"type": "message"` or `"type": "message-updated"`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A message was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreated {
    pub message_id: String,
    pub platform: String,
    pub channel_id: String,
    /// Absent on platforms without guilds/servers.
    #[serde(default)]
    pub guild_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// A message's text was edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdated {
    pub message_id: String,
    pub platform: String,
    pub channel_id: String,
    pub content: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub updated_timestamp: Option<DateTime<Utc>>,
}

impl MessageUpdated {
    /// Edit time carried by the event, or now when the platform did not send one.
    pub fn updated_at_or_now(&self) -> DateTime<Utc> {
        self.updated_timestamp.unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageEvent {
    #[serde(rename = "message")]
    Created(MessageCreated),
    #[serde(rename = "message-updated")]
    Updated(MessageUpdated),
}

impl MessageEvent {
    /// Parses one NDJSON line.
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

/// Receives chat events. Implementations log their own failures; nothing is returned to the
/// bridge, so persistence problems never affect the chat platform.
#[async_trait]
pub trait MessageEventHandler: Send + Sync {
    async fn on_message_created(&self, event: &MessageCreated);

    async fn on_message_updated(&self, event: &MessageUpdated);

    /// Routes `event` to the matching callback.
    async fn dispatch(&self, event: &MessageEvent) {
        match event {
            MessageEvent::Created(created) => self.on_message_created(created).await,
            MessageEvent::Updated(updated) => self.on_message_updated(updated).await,
        }
    }
}
