//! Channel-based heartbeat source.
//!
//! Receives heartbeat records via a tokio watch channel. This models a push
//! subscription on a realtime key/value store: the store side holds the
//! sender and publishes the value at a key whenever it changes, and this
//! source always sees the latest value.

use tokio::sync::watch;

use super::{HeartbeatSource, RawHeartbeat};

/// A heartbeat source subscribed to a single key through a watch channel.
///
/// Dropping the source unsubscribes: the sender's next `send` fails and the
/// producer can stop forwarding.
///
/// # Example
///
/// ```
/// use pulsewatch::{ChannelSource, HeartbeatSource};
/// use serde_json::json;
///
/// let (tx, mut source) = ChannelSource::create("botStatus");
/// tx.send(json!({"online": true, "uptimeSeconds": 12})).unwrap();
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<RawHeartbeat>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// The value currently held by the channel is delivered on the first
    /// poll, the same way a store subscription fires once with the existing
    /// value.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `key` - The store key being watched (e.g., "botStatus")
    pub fn new(mut receiver: watch::Receiver<RawHeartbeat>, key: &str) -> Self {
        receiver.mark_changed();
        Self {
            receiver,
            description: format!("channel: {}", key),
            closed: false,
        }
    }

    /// Create a channel pair for publishing records to a ChannelSource.
    ///
    /// The key starts out with no value (`null`), which is never returned
    /// from `poll`.
    pub fn create(key: &str) -> (watch::Sender<RawHeartbeat>, Self) {
        let (tx, rx) = watch::channel(RawHeartbeat::Null);
        let source = Self::new(rx, key);
        (tx, source)
    }
}

impl HeartbeatSource for ChannelSource {
    fn poll(&mut self) -> Option<RawHeartbeat> {
        match self.receiver.has_changed() {
            Ok(true) => {
                let record = self.receiver.borrow_and_update().clone();
                if record.is_null() {
                    None
                } else {
                    Some(record)
                }
            }
            Ok(false) => None,
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.closed.then(|| "Subscription closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("botStatus");

        // No value at the key yet
        assert!(source.poll().is_none());

        tx.send(json!({"online": true, "uptimeSeconds": 1})).unwrap();
        let record = source.poll();
        assert_eq!(record, Some(json!({"online": true, "uptimeSeconds": 1})));

        // No change, so poll returns None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_returns_latest_only() {
        let (tx, mut source) = ChannelSource::create("botStatus");

        tx.send(json!({"online": true, "uptimeSeconds": 1})).unwrap();
        tx.send(json!({"online": true, "uptimeSeconds": 2})).unwrap();

        assert_eq!(source.poll(), Some(json!({"online": true, "uptimeSeconds": 2})));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_delivers_existing_value() {
        let (tx, rx) = watch::channel(json!({"online": true, "uptimeSeconds": 9}));
        let mut source = ChannelSource::new(rx, "botStatus");

        assert!(source.poll().is_some());
        assert_eq!(source.description(), "channel: botStatus");
        drop(tx);
    }

    #[test]
    fn test_channel_source_closed() {
        let (tx, mut source) = ChannelSource::create("botStatus");
        assert!(source.error().is_none());

        drop(tx);
        // The first poll may still consume the initial empty value
        assert!(source.poll().is_none());
        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("Subscription closed"));
    }

    #[test]
    fn test_dropping_source_unsubscribes() {
        let (tx, source) = ChannelSource::create("botStatus");
        drop(source);
        assert!(tx.send(json!({"online": true, "uptimeSeconds": 1})).is_err());
    }
}
