// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # pulsewatch
//!
//! A heartbeat staleness monitor for long-running processes such as chat
//! bots.
//!
//! The observed process publishes a record like
//! `{"online": true, "uptimeSeconds": 8123}` into a realtime store. The
//! self-reported `online` flag cannot be trusted (a crashed process leaves
//! it behind as `true`), so pulsewatch derives liveness from whether the
//! uptime counter is still advancing, and dates any outage from the last
//! moment fresh data was seen.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────────┐            │
//! │  │  app    │───▶│   data   │───▶│    report    │──▶ display │
//! │  │ (state) │    │ (monitor)│    │ (projection) │            │
//! │  └────┬────┘    └──────────┘    └──────────────┘            │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                        ┌──────────────┐        │
//! │  │ source  │◀── Channel|File|Stream │ server_count │        │
//! │  │ (input) │                        │ (documents)  │        │
//! │  └─────────┘                        └──────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Owns one source and one monitor; drains heartbeats before
//!   each staleness tick
//! - **[`source`]**: The [`HeartbeatSource`] trait with channel (push
//!   subscription), file polling and byte stream implementations
//! - **[`data`]**: The staleness [`Monitor`] and duration helpers
//! - **[`report`]**: [`StatusReport`], the read-only view for status pages
//! - **[`server_count`]**: Best-effort server count read from a document store
//! - **[`config`]**: Layered settings
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a heartbeat file the bot rewrites
//! pulsewatch --file botStatus.json
//!
//! # Watch a TCP feed of newline-delimited records
//! pulsewatch --connect localhost:9090
//! ```
//!
//! ### As a library with a push subscription
//!
//! ```
//! use pulsewatch::{App, ChannelSource, Monitor};
//! use pulsewatch_types::Timestamp;
//! use serde_json::json;
//!
//! let (tx, source) = ChannelSource::create("botStatus");
//! let mut app = App::new(Box::new(source), Monitor::new());
//!
//! tx.send(json!({"online": true, "uptimeSeconds": 100})).unwrap();
//! app.refresh(Timestamp::from_millis(0));
//! assert!(app.monitor.is_online());
//!
//! app.refresh(Timestamp::from_millis(121_000));
//! assert!(!app.monitor.is_online());
//! assert_eq!(app.monitor.offline_since(), Some(Timestamp::from_millis(0)));
//! ```
//!
//! ### As a library with a stream source
//!
//! ```no_run
//! use pulsewatch::StreamSource;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
//! let source = StreamSource::from_bytes_channel(rx, "realtime-db");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod report;
pub mod server_count;
pub mod source;

// Re-export main types for convenience
pub use app::{App, Refresh};
pub use crate::config::Settings;
pub use data::{Freshness, Monitor, MonitorState, Transition, STALENESS_THRESHOLD, TICK_INTERVAL};
pub use report::StatusReport;
pub use server_count::{
    read_server_count, DocumentStore, FileDocumentStore, MemoryDocumentStore, StoreError,
};
pub use source::{
    parse_record, ChannelSource, FileSource, HeartbeatSource, RawHeartbeat, StreamSource,
};
