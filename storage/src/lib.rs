//! Storage crate: durable message capture over a supervised connection.
//!
//! ## Modules
//!
//! - [`error`] – Storage error taxonomy
//! - [`models`] – MessageRecord, MessageKey
//! - [`config`] – StorageConfig (env)
//! - [`retry`] – RetryPolicy
//! - [`store`] – MessageStore / Connector traits
//! - [`sqlite_store`] – SqliteMessageStore, SqliteConnector
//! - [`supervisor`] – ConnectionSupervisor (reconnection state machine)
//! - [`adapter`] – StorageAdapter

mod adapter;
mod config;
mod error;
mod models;
mod retry;
mod sqlite_pool;
mod sqlite_store;
mod store;
mod supervisor;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod sqlite_store_test;

pub use adapter::StorageAdapter;
pub use config::{
    mask_url_password, BackoffKind, StorageConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE_NAME,
    DEFAULT_RETRY_DELAY_MS, ENV_COLLECTION, ENV_DATABASE_NAME, ENV_DATABASE_URL, ENV_DEBUG,
    ENV_RECONNECT_ON_WRITE_FAILURE, ENV_RETRY_BACKOFF, ENV_RETRY_DELAY_MS,
    ENV_RETRY_MAX_ATTEMPTS, ENV_RETRY_MAX_DELAY_MS,
};
pub use error::{Result, StorageError};
pub use models::{MessageKey, MessageRecord};
pub use retry::{Backoff, RetryPolicy, DEFAULT_RETRY_DELAY};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::{SqliteConnector, SqliteMessageStore};
pub use store::{Connector, MessageStore};
pub use supervisor::{ConnectionState, ConnectionSupervisor};
