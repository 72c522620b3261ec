//! # pulsewatch-types
//!
//! Core types shared between heartbeat publishers and the pulsewatch
//! monitor. A long-running process (a chat bot, a worker) periodically
//! publishes a [`HeartbeatRecord`] carrying a monotonic uptime counter;
//! consumers derive a [`Verdict`] from whether that counter keeps advancing.
//!
//! ## Features
//!
//! - `std` (default): wall-clock helpers such as [`Timestamp::now`]
//! - `serde`: JSON serialization via serde, using the camelCase field names
//!   publishers write (`uptimeSeconds`)
//!
//! ## Example
//!
//! ```rust
//! use pulsewatch_types::{HeartbeatRecord, Timestamp, Verdict};
//! use std::time::Duration;
//!
//! let record = HeartbeatRecord::new(true, 3600);
//! assert_eq!(record.uptime_seconds, 3600);
//!
//! let seen = Timestamp::from_millis(1_000);
//! let later = seen.checked_add(Duration::from_secs(5)).unwrap();
//! assert_eq!(later.duration_since(seen), Duration::from_secs(5));
//!
//! assert_eq!(Verdict::Offline.badge(), "Down");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod heartbeat;
mod server_count;
mod timestamp;
mod verdict;

pub use heartbeat::*;
pub use server_count::*;
pub use timestamp::*;
pub use verdict::*;
