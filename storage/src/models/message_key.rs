//! Natural key of a persisted message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// (`platform`, `channel_id`, `message_id`): message ids are only unique inside one channel of one platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    pub platform: String,
    pub channel_id: String,
    pub message_id: String,
}

impl MessageKey {
    pub fn new(
        platform: impl Into<String>,
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// Formats as `platform/channel_id/message_id`; used in log fields.
impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.platform, self.channel_id, self.message_id)
    }
}
