//! Persistence layer for the practime ledger.
//!
//! The ledger is a handful of counters kept in a flat key-value namespace, the
//! same shape the browser extension keeps in its local storage area. This
//! module provides the storage contract and its backends.
//!
//! ## Features
//!
//! - **SQLite backend**: durable `storage(key, value)` table in the platform
//!   data directory
//! - **Memory backend**: latency and failure injection for tests
//! - **Wire compatibility**: keys and JSON values match existing installs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practime::db::storage::SqliteStore;
//! use practime::libs::ledger::Ledger;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let (ledger, _worker) = Ledger::spawn(SqliteStore::new()?);
//! # Ok(())
//! # }
//! ```

/// Connection setup and schema.
pub mod db;

/// In-process store used by tests and demos.
pub mod memory;

/// The async storage contract and the SQLite implementation.
pub mod storage;
