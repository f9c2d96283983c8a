//! Test backend whose availability can be switched off and on.
//!
//! All connections share one in-memory SQLite store, so data written before an outage is
//! still there after reconnecting.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use storage::{
    Connector, MessageKey, MessageRecord, MessageStore, Result, SqliteMessageStore, StorageError,
};

#[derive(Clone)]
pub struct FlakyBackend {
    store: SqliteMessageStore,
    available: Arc<AtomicBool>,
    reject_writes: Arc<AtomicBool>,
    connect_attempts: Arc<AtomicUsize>,
}

impl FlakyBackend {
    pub async fn new() -> Self {
        let store = SqliteMessageStore::open("sqlite::memory:", "chat_archive.messages")
            .await
            .expect("Failed to open in-memory store");
        Self {
            store,
            available: Arc::new(AtomicBool::new(true)),
            reject_writes: Arc::new(AtomicBool::new(false)),
            connect_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// While set, inserts fail with a WriteFailure over a live connection.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn connector(&self) -> FlakyConnector {
        FlakyConnector {
            backend: self.clone(),
        }
    }

    /// Reads the shared store directly, bypassing availability.
    pub async fn peek(&self, key: &MessageKey) -> Option<MessageRecord> {
        self.store.find(key).await.expect("Direct read failed")
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::ConnectionFailure(
                "backend unreachable".to_string(),
            ))
        }
    }
}

pub struct FlakyConnector {
    backend: FlakyBackend,
}

#[async_trait]
impl Connector for FlakyConnector {
    type Connection = FlakyConnection;

    async fn connect(&self) -> Result<FlakyConnection> {
        self.backend.connect_attempts.fetch_add(1, Ordering::SeqCst);
        self.backend.check_available()?;
        Ok(FlakyConnection {
            backend: self.backend.clone(),
        })
    }
}

#[derive(Clone)]
pub struct FlakyConnection {
    backend: FlakyBackend,
}

#[async_trait]
impl MessageStore for FlakyConnection {
    async fn insert(&self, record: &MessageRecord) -> Result<()> {
        self.backend.check_available()?;
        if self.backend.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailure(
                "document failed validation".to_string(),
            ));
        }
        self.backend.store.insert(record).await
    }

    async fn update_content(
        &self,
        key: &MessageKey,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        self.backend.check_available()?;
        self.backend
            .store
            .update_content(key, content, updated_at)
            .await
    }

    async fn find(&self, key: &MessageKey) -> Result<Option<MessageRecord>> {
        self.backend.check_available()?;
        self.backend.store.find(key).await
    }

    async fn recent_in_channel(
        &self,
        platform: &str,
        channel_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageRecord>> {
        self.backend.check_available()?;
        self.backend
            .store
            .recent_in_channel(platform, channel_id, limit)
            .await
    }

    /// The shared store outlives individual connections.
    async fn close(&self) {}
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
}

/// `{messageId:"m1", platform:"p", channelId:"c1", content:"hello", createdAt: T0}`
pub fn hello_record() -> MessageRecord {
    MessageRecord::new(MessageKey::new("p", "c1", "m1"), "", "u1", "alice", "hello", t0())
}
