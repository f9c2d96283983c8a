//! SQLite message store and its connector.
//!
//! One table per configured namespace, created on connect. Queries go through
//! [`SqlitePoolManager`]; driver errors are classified by `From<sqlx::Error>`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::models::{MessageKey, MessageRecord};
use crate::sqlite_pool::{is_in_memory, SqlitePoolManager};
use crate::store::{Connector, MessageStore};

const RECORD_COLUMNS: &str =
    "message_id, platform, channel_id, guild_id, user_id, username, content, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteMessageStore {
    pool_manager: SqlitePoolManager,
    /// Quoted table identifier, ready to splice into SQL.
    table: Arc<str>,
}

impl SqliteMessageStore {
    /// Opens `database_url` and creates `table_name` (plus its key index) if missing.
    pub async fn open(database_url: &str, table_name: &str) -> Result<Self> {
        let pool_manager = SqlitePoolManager::new(database_url)
            .await
            .map_err(|e| StorageError::ConnectionFailure(e.to_string()))?;
        Self::with_pool(pool_manager, table_name).await
    }

    async fn with_pool(pool_manager: SqlitePoolManager, table_name: &str) -> Result<Self> {
        let store = Self {
            pool_manager,
            table: quote_ident(table_name).into(),
        };
        store
            .init(table_name)
            .await
            .map_err(|e| StorageError::ConnectionFailure(e.to_string()))?;
        Ok(store)
    }

    async fn init(&self, table_name: &str) -> std::result::Result<(), sqlx::Error> {
        info!(table = %table_name, "Creating message table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id TEXT NOT NULL,
                platform TEXT NOT NULL,
                channel_id TEXT NOT NULL,
                guild_id TEXT NOT NULL DEFAULT '',
                user_id TEXT NOT NULL,
                username TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            "#,
            self.table
        ))
        .execute(pool)
        .await?;

        let index = quote_ident(&format!("idx_{}_key", table_name.replace('.', "_")));
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (platform, channel_id, message_id)",
            index, self.table
        ))
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn insert(&self, record: &MessageRecord) -> Result<()> {
        let pool = self.pool_manager.pool();

        sqlx::query(&format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL)",
            self.table, RECORD_COLUMNS
        ))
        .bind(&record.message_id)
        .bind(&record.platform)
        .bind(&record.channel_id)
        .bind(&record.guild_id)
        .bind(&record.user_id)
        .bind(&record.username)
        .bind(&record.content)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        debug!(key = %record.key(), "Inserted message");
        Ok(())
    }

    async fn update_content(
        &self,
        key: &MessageKey,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(&format!(
            "UPDATE {} SET content = ?, updated_at = ? \
             WHERE platform = ? AND channel_id = ? AND message_id = ?",
            self.table
        ))
        .bind(content)
        .bind(updated_at)
        .bind(&key.platform)
        .bind(&key.channel_id)
        .bind(&key.message_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find(&self, key: &MessageKey) -> Result<Option<MessageRecord>> {
        let pool = self.pool_manager.pool();

        let record = sqlx::query_as::<_, MessageRecord>(&format!(
            "SELECT {} FROM {} \
             WHERE platform = ? AND channel_id = ? AND message_id = ? \
             ORDER BY id ASC LIMIT 1",
            RECORD_COLUMNS, self.table
        ))
        .bind(&key.platform)
        .bind(&key.channel_id)
        .bind(&key.message_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    async fn recent_in_channel(
        &self,
        platform: &str,
        channel_id: &str,
        limit: i64,
    ) -> Result<Vec<MessageRecord>> {
        let pool = self.pool_manager.pool();

        let records = sqlx::query_as::<_, MessageRecord>(&format!(
            "SELECT {} FROM {} WHERE platform = ? AND channel_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            RECORD_COLUMNS, self.table
        ))
        .bind(platform)
        .bind(channel_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        debug!(
            platform = %platform,
            channel_id = %channel_id,
            count = records.len(),
            "Retrieved recent messages"
        );
        Ok(records)
    }

    async fn close(&self) {
        self.pool_manager.close().await;
    }
}

/// Opens [`SqliteMessageStore`]s for one database URL and table.
///
/// An in-memory database disappears with its last connection, so for those URLs the connector
/// holds one pool open for its own lifetime and every store reuses its connect options. Records
/// then survive reconnection.
#[derive(Clone)]
pub struct SqliteConnector {
    database_url: String,
    table_name: String,
    memory_anchor: Option<Arc<OnceCell<SqlitePoolManager>>>,
}

impl SqliteConnector {
    pub fn new(database_url: impl Into<String>, table_name: impl Into<String>) -> Self {
        let database_url = database_url.into();
        let memory_anchor = is_in_memory(&database_url).then(|| Arc::new(OnceCell::new()));
        Self {
            database_url,
            table_name: table_name.into(),
            memory_anchor,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.database_url, config.table_name())
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Connection = SqliteMessageStore;

    async fn connect(&self) -> Result<SqliteMessageStore> {
        let Some(anchor) = &self.memory_anchor else {
            return SqliteMessageStore::open(&self.database_url, &self.table_name).await;
        };

        let anchor = anchor
            .get_or_try_init(|| SqlitePoolManager::new(&self.database_url))
            .await
            .map_err(|e| StorageError::ConnectionFailure(e.to_string()))?;
        let pool_manager = SqlitePoolManager::with_options(anchor.options().clone(), true)
            .await
            .map_err(|e| StorageError::ConnectionFailure(e.to_string()))?;
        SqliteMessageStore::with_pool(pool_manager, &self.table_name).await
    }
}

/// Wraps `name` in double quotes, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
