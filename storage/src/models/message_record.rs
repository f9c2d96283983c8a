//! Message record model for persistence.
//!
//! One row per observed message. Read back by [`crate::MessageStore::find`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub message_id: String,
    pub platform: String,
    pub channel_id: String,
    /// Empty when the platform has no grouping above channels.
    pub guild_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// Set once at insert.
    pub created_at: DateTime<Utc>,
    /// `None` until the first edit.
    pub updated_at: Option<DateTime<Utc>>,
}

impl MessageRecord {
    /// Creates a never-edited record for `key`.
    pub fn new(
        key: MessageKey,
        guild_id: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: key.message_id,
            platform: key.platform,
            channel_id: key.channel_id,
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            username: username.into(),
            content: content.into(),
            created_at,
            updated_at: None,
        }
    }

    pub fn key(&self) -> MessageKey {
        MessageKey::new(&self.platform, &self.channel_id, &self.message_id)
    }
}
