//! Durable storage for the usage ledger.
//!
//! The ledger is stored the way the browser extension stores it: a flat
//! key-value namespace where every field of [`LedgerRecord`] is its own key.
//! [`LedgerStore`] is the async contract the ledger actor talks to;
//! [`SqliteStore`] is the on-disk implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practime::db::storage::{LedgerStore, SqliteStore};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let store = SqliteStore::new()?;
//! if let Some(record) = store.read().await? {
//!     println!("total: {}ms", record.total_time_ms);
//! }
//! # Ok(())
//! # }
//! ```

use crate::db::db::Db;
use crate::libs::accumulator::LedgerRecord;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Storage keys owned by the ledger, in wire spelling.
pub const LEDGER_KEYS: [&str; 7] = [
    "totalTime",
    "todayTime",
    "lastDate",
    "totalRunClicks",
    "totalSubmitClicks",
    "todayRunClicks",
    "todaySubmitClicks",
];

const SELECT_VALUE: &str = "SELECT value FROM storage WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO storage (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Failures of the storage layer.
///
/// All of them are transient from the tracker's point of view: the operation
/// that hit one is dropped and tracking carries on.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored value for '{key}' could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("ledger record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage worker failed: {0}")]
    Worker(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("ledger is no longer running")]
    Closed,
}

/// Async read/write contract for the persisted ledger.
pub trait LedgerStore: Send + Sync + 'static {
    /// Returns `None` when no ledger key has ever been written.
    fn read(&self) -> impl Future<Output = Result<Option<LedgerRecord>, LedgerError>> + Send;

    /// Replaces every ledger key with the values from `record`.
    fn write(&self, record: &LedgerRecord) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// SQLite-backed ledger store.
///
/// Queries run on tokio's blocking pool. The connection sits behind a mutex so
/// clones of the store can be shared between the ledger and CLI commands.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens `practime.db` in the application data directory.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::in_memory()?))
    }

    fn from_db(db: Db) -> Self {
        Self {
            conn: Arc::new(Mutex::new(db.conn)),
        }
    }

    /// Raw JSON text stored under `key`, if any.
    pub fn raw_value(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let conn = self.conn.lock();
        select_value(&conn, key)
    }

    fn read_blocking(conn: &Connection) -> Result<Option<LedgerRecord>, LedgerError> {
        let mut fields = Map::new();
        for key in LEDGER_KEYS {
            if let Some(text) = select_value(conn, key)? {
                let value: Value = serde_json::from_str(&text).map_err(|source| LedgerError::Decode {
                    key: key.to_string(),
                    source,
                })?;
                fields.insert(key.to_string(), value);
            }
        }

        if fields.is_empty() {
            return Ok(None);
        }

        serde_json::from_value(Value::Object(fields))
            .map(Some)
            .map_err(|source| LedgerError::Decode {
                key: "ledger".to_string(),
                source,
            })
    }

    fn write_blocking(conn: &mut Connection, record: &LedgerRecord) -> Result<(), LedgerError> {
        let Value::Object(fields) = serde_json::to_value(record)? else {
            return Err(LedgerError::Worker("ledger record did not encode as an object".to_string()));
        };

        let tx = conn.transaction()?;
        for (key, value) in &fields {
            tx.execute(UPSERT_VALUE, params![key, value.to_string()])?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl LedgerStore for SqliteStore {
    async fn read(&self) -> Result<Option<LedgerRecord>, LedgerError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || Self::read_blocking(&conn.lock()))
            .await
            .map_err(|e| LedgerError::Worker(e.to_string()))?
    }

    async fn write(&self, record: &LedgerRecord) -> Result<(), LedgerError> {
        let conn = self.conn.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || Self::write_blocking(&mut conn.lock(), &record))
            .await
            .map_err(|e| LedgerError::Worker(e.to_string()))?
    }
}

fn select_value(conn: &Connection, key: &str) -> Result<Option<String>, LedgerError> {
    let mut stmt = conn.prepare_cached(SELECT_VALUE)?;
    let mut rows = stmt.query([key])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}
