//! Unit tests for SqliteMessageStore.
//!
//! Uses in-memory SQLite (sqlite::memory:); covers insert/find, update_content and channel listing.

use crate::models::{MessageKey, MessageRecord};
use crate::sqlite_store::{SqliteConnector, SqliteMessageStore};
use crate::store::{Connector, MessageStore};
use chrono::{Duration, TimeZone, Utc};

const TABLE: &str = "chat_archive.messages";

async fn open_store() -> SqliteMessageStore {
    SqliteMessageStore::open("sqlite::memory:", TABLE)
        .await
        .expect("Failed to open store")
}

fn record(channel_id: &str, message_id: &str, content: &str, minute: u32) -> MessageRecord {
    MessageRecord::new(
        MessageKey::new("discord", channel_id, message_id),
        "g1",
        "u1",
        "alice",
        content,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_insert_then_find_returns_same_record() {
    let store = open_store().await;
    let message = record("c1", "m1", "hello", 0);

    store.insert(&message).await.expect("Failed to insert");

    let found = store
        .find(&message.key())
        .await
        .expect("Failed to query")
        .expect("Record missing");
    assert_eq!(found, message);
    assert!(found.updated_at.is_none());
}

#[tokio::test]
async fn test_insert_ignores_updated_at() {
    let store = open_store().await;
    let mut message = record("c1", "m1", "hello", 0);
    message.updated_at = Some(message.created_at + Duration::minutes(5));

    store.insert(&message).await.expect("Failed to insert");

    let found = store.find(&message.key()).await.unwrap().unwrap();
    assert!(found.updated_at.is_none());
}

#[tokio::test]
async fn test_find_not_found() {
    let store = open_store().await;

    let found = store
        .find(&MessageKey::new("discord", "c1", "missing"))
        .await
        .expect("Failed to query");

    assert!(found.is_none());
}

#[tokio::test]
async fn test_update_content_matches_full_key_only() {
    let store = open_store().await;
    let message = record("c1", "m1", "hello", 0);
    let same_id_other_channel = record("c2", "m1", "other", 1);
    store.insert(&message).await.unwrap();
    store.insert(&same_id_other_channel).await.unwrap();

    let edited_at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
    let affected = store
        .update_content(&message.key(), "hello edited", edited_at)
        .await
        .expect("Failed to update");

    assert_eq!(affected, 1);
    let untouched = store
        .find(&same_id_other_channel.key())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched, same_id_other_channel);
}

#[tokio::test]
async fn test_duplicate_inserts_are_tolerated() {
    let store = open_store().await;
    let message = record("c1", "m1", "hello", 0);

    store.insert(&message).await.expect("First insert failed");
    store.insert(&message).await.expect("Duplicate insert failed");

    let recent = store.recent_in_channel("discord", "c1", 10).await.unwrap();
    assert_eq!(recent.len(), 2);
}

#[tokio::test]
async fn test_recent_in_channel_order_and_limit() {
    let store = open_store().await;
    for i in 0..15 {
        store
            .insert(&record("c1", &format!("m{}", i), &format!("Message {}", i), i))
            .await
            .unwrap();
    }
    store.insert(&record("c2", "x", "elsewhere", 30)).await.unwrap();

    let recent = store.recent_in_channel("discord", "c1", 10).await.unwrap();

    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].message_id, "m14");
    assert!(recent.iter().all(|r| r.channel_id == "c1"));
    assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_closed_store_reports_connection_failure() {
    let store = open_store().await;
    store.close().await;

    let err = store
        .insert(&record("c1", "m1", "hello", 0))
        .await
        .unwrap_err();

    assert!(err.is_connection_failure());
}

#[tokio::test]
async fn test_connector_reopens_file_database() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("capture.db").display());
    let connector = SqliteConnector::new(&url, TABLE);

    let first = connector.connect().await.expect("Failed to connect");
    let message = record("c1", "m1", "hello", 0);
    first.insert(&message).await.unwrap();
    first.close().await;

    let second = connector.connect().await.expect("Failed to reconnect");
    let found = second.find(&message.key()).await.unwrap();
    assert_eq!(found, Some(message));
}

#[tokio::test]
async fn test_connector_keeps_in_memory_database_across_reconnects() {
    let connector = SqliteConnector::new("sqlite::memory:", TABLE);

    let first = connector.connect().await.expect("Failed to connect");
    let message = record("c1", "m1", "hello", 0);
    first.insert(&message).await.unwrap();
    first.close().await;

    let second = connector.connect().await.expect("Failed to reconnect");
    assert_eq!(second.find(&message.key()).await.unwrap(), Some(message));
}

#[tokio::test]
async fn test_separate_in_memory_connectors_do_not_share_data() {
    let a = SqliteConnector::new("sqlite::memory:", TABLE);
    let b = SqliteConnector::new("sqlite::memory:", TABLE);

    let message = record("c1", "m1", "hello", 0);
    a.connect().await.unwrap().insert(&message).await.unwrap();

    let other = b.connect().await.unwrap();
    assert!(other.find(&message.key()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_connector_fails_on_unreachable_path() {
    let connector = SqliteConnector::new(
        "sqlite:///nonexistent-dir/definitely/missing/capture.db",
        TABLE,
    );

    let err = connector.connect().await.err().expect("Connect should fail");
    assert!(err.is_connection_failure());
}
