use crate::location::StoreLocation;
use crate::{record::LogRecord, store::LogStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Executor};
use std::error::Error;
use std::str::FromStr;
use tokio::sync::Mutex;

/// Idempotent schema bootstrap for the `logs` table.
pub const CREATE_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    prefix      VARCHAR(256) NULL,
    level       CHAR(256)    NOT NULL,
    description VARCHAR(256) NOT NULL,
    is_exported INT          NULL,
    created_at  DATETIME     NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Parameterized insert, bound as `(prefix, level, description, created_at)`.
pub const INSERT_LOG: &str =
    "INSERT INTO logs (prefix, level, description, created_at) VALUES (?, ?, ?, ?)";

/// Error type returned by [`SqliteStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("can't open log store: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("ping error: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("can not create logs table: {0}")]
    Bootstrap(#[source] sqlx::Error),

    #[error("can not create prepared statement: {0}")]
    Prepare(#[source] sqlx::Error),

    #[error("log store connection is closed")]
    Closed,
}

/// SQLite-backed store writing one row per record into the `logs` table.
///
/// A single connection is shared behind an async mutex. sqlx keeps the
/// insert statement in its per-connection statement cache, so it is only
/// compiled once.
pub struct SqliteStore {
    conn: Mutex<Option<SqliteConnection>>,
}

impl SqliteStore {
    /// Open the database at `location`, make sure the `logs` table exists and
    /// validate the insert statement against it.
    ///
    /// Any failure here is a startup failure: the caller should not go on
    /// logging into a store that could not be prepared.
    pub async fn connect(location: &StoreLocation) -> Result<Self, StoreError> {
        let options = match location {
            StoreLocation::Memory => {
                SqliteConnectOptions::from_str("sqlite::memory:").map_err(StoreError::Connect)?
            }
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
        };

        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(StoreError::Connect)?;

        conn.ping().await.map_err(StoreError::Ping)?;

        sqlx::query(CREATE_LOGS_TABLE)
            .execute(&mut conn)
            .await
            .map_err(StoreError::Bootstrap)?;

        (&mut conn)
            .prepare(INSERT_LOG)
            .await
            .map_err(StoreError::Prepare)?;

        tracing::debug!(?location, "log store ready");

        Ok(SqliteStore {
            conn: Mutex::new(Some(conn)),
        })
    }

    pub async fn is_closed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

#[async_trait]
impl LogStore for SqliteStore {
    async fn insert(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;

        sqlx::query(INSERT_LOG)
            .bind(record.prefix.as_deref())
            .bind(record.level.as_str())
            .bind(record.text.as_str())
            .bind(record.timestamp)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Taking the connection out makes a second close a no-op.
        let conn = self.conn.lock().await.take();
        if let Some(conn) = conn {
            conn.close().await?;
        }
        Ok(())
    }
}
