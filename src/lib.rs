//! # Practime - practice time tracking for coding-problem sites
//!
//! The background core of a browser extension that measures how long the
//! user actively spends on problem pages (LeetCode, GeeksforGeeks, or any
//! configured pattern) and counts "Run" and "Submit" clicks.
//!
//! ## Features
//!
//! - **Session tracking**: one open session on the focused problem tab
//! - **Idle detection**: sessions pause after 30 seconds without activity
//! - **Daily rollover**: today's counters reset on the first write of a new day
//! - **Durable ledger**: serialized updates over a key-value store
//! - **Host protocol**: JSON signals in, JSON stats out
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practime::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
