//! Persisted message shape and its natural key.

mod message_key;
mod message_record;

pub use message_key::MessageKey;
pub use message_record::MessageRecord;
