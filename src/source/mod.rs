//! Heartbeat source abstraction.
//!
//! This module provides a trait-based abstraction for receiving heartbeat
//! records from the store a bot publishes into (a realtime key/value
//! database, a file written by the bot, a TCP feed, etc.).

mod channel;
mod file;
mod record;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use record::{parse_record, RawHeartbeat, ONLINE_FIELD, UPTIME_FIELD};
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving heartbeat records from various sources.
///
/// Sources hand back records exactly as received. Validation is the
/// monitor's job, so a source never drops a record for being malformed.
///
/// # Example
///
/// ```
/// use pulsewatch::{FileSource, HeartbeatSource};
///
/// let mut source = FileSource::new("heartbeat.json");
/// if let Some(record) = source.poll() {
///     println!("Got heartbeat: {}", record);
/// }
/// ```
pub trait HeartbeatSource: Send + Debug {
    /// Poll for the next record that has not been returned yet.
    ///
    /// Returns `None` if nothing new has arrived. Must not block. Callers
    /// drain a source by polling until it returns `None`.
    fn poll(&mut self) -> Option<RawHeartbeat>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error encountered during the last poll, if any.
    fn error(&self) -> Option<String>;
}
