//! Heartbeat record published by the observed process.

/// The latest heartbeat a process has published.
///
/// `online` is whatever the process last claimed about itself. It can be
/// left behind as `true` by a process that crashed, so consumers should
/// derive liveness from `uptime_seconds` advancing instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HeartbeatRecord {
    /// Self-reported liveness flag.
    pub online: bool,

    /// Seconds since the process started. Resets to zero on restart.
    pub uptime_seconds: u64,
}

impl HeartbeatRecord {
    /// Create a new record.
    pub const fn new(online: bool, uptime_seconds: u64) -> Self {
        Self {
            online,
            uptime_seconds,
        }
    }

    /// True if `self` reports a lower uptime than `previous`, meaning the
    /// process restarted in between.
    pub const fn is_restart_of(&self, previous: u64) -> bool {
        self.uptime_seconds < previous
    }
}
