//! Heartbeat staleness monitor.
//!
//! Turns a possibly stale, possibly misleading liveness signal into an
//! online/offline verdict. The observed process publishes an uptime counter;
//! as long as that counter keeps changing the process is online. Once it
//! has not changed for longer than the staleness threshold, the process is
//! offline, and the outage is dated from the last time fresh data was seen.
//!
//! The monitor never reads the clock itself. Every operation takes `now`,
//! so the verdict is a deterministic function of the observations made and
//! the time they are evaluated at.

use std::time::Duration;

use pulsewatch_types::{HeartbeatRecord, Timestamp, Verdict};
use tracing::debug;

use crate::source::{parse_record, RawHeartbeat};

/// Maximum gap since the last fresh heartbeat before declaring an outage.
pub const STALENESS_THRESHOLD: Duration = Duration::from_secs(120);

/// Period of the staleness tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How a heartbeat compared to what the monitor had already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The uptime counter advanced (or this is the first observation).
    Fresh,
    /// The uptime counter went backwards: the process restarted.
    Restart,
    /// Same uptime as before; carries no new information.
    Duplicate,
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        !matches!(self, Freshness::Duplicate)
    }
}

/// A change of verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The source went stale. `since` is when fresh data was last seen.
    WentOffline { since: Timestamp },
    /// A fresh heartbeat arrived while offline.
    CameOnline,
}

/// The most recent uptime value and when it last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    uptime_seconds: u64,
    changed_at: Timestamp,
}

/// State owned by one monitor for one observed source.
///
/// Before the first heartbeat there is no observation, the verdict is
/// offline and `offline_since` is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    last_observed: Option<Observation>,
    verdict: Verdict,
    offline_since: Option<Timestamp>,
}

impl MonitorState {
    /// The last uptime value seen, if any.
    pub fn last_observed_uptime(&self) -> Option<u64> {
        self.last_observed.map(|o| o.uptime_seconds)
    }

    /// When the uptime value last changed, if ever.
    pub fn last_observed_at(&self) -> Option<Timestamp> {
        self.last_observed.map(|o| o.changed_at)
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn offline_since(&self) -> Option<Timestamp> {
        self.offline_since
    }
}

/// Derives liveness from a stream of heartbeat records.
///
/// # Example
///
/// ```
/// use pulsewatch::Monitor;
/// use pulsewatch_types::{HeartbeatRecord, Timestamp};
///
/// let mut monitor = Monitor::new();
/// monitor.observe(HeartbeatRecord::new(true, 100), Timestamp::from_millis(0));
/// assert!(monitor.is_online());
///
/// monitor.tick(Timestamp::from_millis(121_000));
/// assert!(!monitor.is_online());
/// assert_eq!(monitor.offline_since(), Some(Timestamp::from_millis(0)));
/// ```
#[derive(Debug, Clone)]
pub struct Monitor {
    state: MonitorState,
    threshold: Duration,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    /// Create a monitor with the default two minute threshold.
    pub fn new() -> Self {
        Self::with_threshold(STALENESS_THRESHOLD)
    }

    pub fn with_threshold(threshold: Duration) -> Self {
        Self {
            state: MonitorState::default(),
            threshold,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Handle a raw record from the store.
    ///
    /// Records that fail the shape check are ignored and `None` is returned.
    pub fn on_heartbeat(&mut self, raw: &RawHeartbeat, now: Timestamp) -> Option<Freshness> {
        match parse_record(raw) {
            Some(record) => Some(self.observe(record, now)),
            None => {
                debug!("Ignoring malformed heartbeat: {}", raw);
                None
            }
        }
    }

    /// Handle a validated record.
    ///
    /// A changed uptime value, in either direction, marks the source online
    /// immediately. An unchanged value leaves the state untouched; detecting
    /// staleness is left to [`Monitor::tick`].
    pub fn observe(&mut self, record: HeartbeatRecord, now: Timestamp) -> Freshness {
        let freshness = match self.state.last_observed {
            Some(prev) if prev.uptime_seconds == record.uptime_seconds => Freshness::Duplicate,
            Some(prev) if record.is_restart_of(prev.uptime_seconds) => Freshness::Restart,
            _ => Freshness::Fresh,
        };

        if freshness.is_fresh() {
            self.state.last_observed = Some(Observation {
                uptime_seconds: record.uptime_seconds,
                changed_at: now,
            });
            self.state.verdict = Verdict::Online;
            self.state.offline_since = None;
        }

        freshness
    }

    /// Re-evaluate staleness at `now`.
    ///
    /// Returns the transition if the verdict changed.
    pub fn tick(&mut self, now: Timestamp) -> Option<Transition> {
        let Some(observation) = self.state.last_observed else {
            // Never heard from the source: offline, start unknown
            self.state.verdict = Verdict::Offline;
            self.state.offline_since = None;
            return None;
        };

        let elapsed = now.duration_since(observation.changed_at);
        if elapsed > self.threshold {
            match self.state.verdict {
                Verdict::Online => {
                    self.state.verdict = Verdict::Offline;
                    self.state.offline_since = Some(observation.changed_at);
                    Some(Transition::WentOffline {
                        since: observation.changed_at,
                    })
                }
                Verdict::Offline => None,
            }
        } else {
            let was = self.state.verdict;
            self.state.verdict = Verdict::Online;
            self.state.offline_since = None;
            (was == Verdict::Offline).then_some(Transition::CameOnline)
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.state.verdict
    }

    pub fn is_online(&self) -> bool {
        self.state.verdict.is_online()
    }

    pub fn offline_since(&self) -> Option<Timestamp> {
        self.state.offline_since
    }

    /// How long the current outage has lasted at `now`.
    ///
    /// `None` while online, and while offline with an unknown start.
    pub fn offline_duration(&self, now: Timestamp) -> Option<Duration> {
        if self.is_online() {
            return None;
        }
        self.state.offline_since.map(|since| now.duration_since(since))
    }
}
