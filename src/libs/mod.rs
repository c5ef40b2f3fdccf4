//! Core library modules for practime.
//!
//! ## Features
//!
//! - **Tracking core**: session state machine, idle detection, activity monitor
//! - **Ledger**: serialized read-merge-write of the persistent counters
//! - **Signals**: typed host events and the router that dispatches them
//! - **Infrastructure**: clock, configuration, data storage, messaging
//! - **User interface**: duration formatting and console tables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practime::db::memory::MemoryStore;
//! use practime::libs::background::Background;
//! use practime::libs::clock::SystemClock;
//! use practime::libs::router::Signal;
//! use practime::libs::tabs::TabTable;
//! use practime::libs::url_matcher::UrlMatcher;
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let tabs = Arc::new(TabTable::new());
//! let core = Background::boot(MemoryStore::new(), tabs, UrlMatcher::default(), Arc::new(SystemClock));
//! let stats = core.router().dispatch(Signal::GetStats).await;
//! core.shutdown().await;
//! # }
//! ```

pub mod accumulator;
pub mod background;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod formatter;
pub mod ledger;
pub mod messages;
pub mod monitor;
pub mod router;
pub mod stats;
pub mod tabs;
pub mod tracker;
pub mod url_matcher;
pub mod view;
