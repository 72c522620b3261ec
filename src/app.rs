//! Application state: one source feeding one monitor.

use std::path::Path;

use anyhow::{Context, Result};
use pulsewatch_types::{HeartbeatRecord, ServerCount, Timestamp};
use tracing::{debug, info, warn};

use crate::data::duration::{format_duration, format_outage};
use crate::data::{Freshness, Monitor, Transition};
use crate::report::StatusReport;
use crate::server_count::{read_server_count, DocumentStore};
use crate::source::{parse_record, HeartbeatSource};

/// What a single refresh observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refresh {
    /// Records taken from the source, well-formed or not.
    pub received: usize,
    /// Records that advanced (or reset) the uptime counter.
    pub fresh: usize,
    /// Verdict changes, in the order they happened.
    pub transitions: Vec<Transition>,
}

/// Main application state.
///
/// Owns the source subscription and the monitor for a single observed
/// process. Dropping the `App` drops the source, which unsubscribes.
pub struct App {
    source: Box<dyn HeartbeatSource>,
    pub monitor: Monitor,
    /// Last well-formed record received, including duplicates.
    pub last_record: Option<HeartbeatRecord>,
    pub server_count: ServerCount,
    pub load_error: Option<String>,
}

impl App {
    /// Create a new App with the given source and monitor.
    pub fn new(source: Box<dyn HeartbeatSource>, monitor: Monitor) -> Self {
        info!(
            "Watching {} (offline after {} without a fresh heartbeat)",
            source.description(),
            format_duration(monitor.threshold())
        );
        Self {
            source,
            monitor,
            last_record: None,
            server_count: ServerCount::Unknown,
            load_error: None,
        }
    }

    /// Returns a description of the current source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Read the server count once from the document store.
    pub fn load_server_count(&mut self, store: &dyn DocumentStore, path: &str) {
        self.server_count = read_server_count(store, path);
        debug!("Server count: {}", self.server_count);
    }

    /// Drain pending heartbeats, then run the staleness tick, all at `now`.
    ///
    /// Heartbeats go first so the tick never judges a `last_observed_at`
    /// that a queued heartbeat would have advanced.
    pub fn refresh(&mut self, now: Timestamp) -> Refresh {
        let mut refresh = Refresh::default();

        while let Some(raw) = self.source.poll() {
            refresh.received += 1;
            let was_online = self.monitor.is_online();

            let Some(record) = parse_record(&raw) else {
                warn!("Ignoring malformed heartbeat from {}: {}", self.source.description(), raw);
                continue;
            };
            self.last_record = Some(record);

            match self.monitor.observe(record, now) {
                Freshness::Duplicate => {
                    debug!("Duplicate heartbeat (uptime {}s)", record.uptime_seconds);
                }
                freshness => {
                    refresh.fresh += 1;
                    if freshness == Freshness::Restart {
                        info!("Source restarted (uptime reset to {}s)", record.uptime_seconds);
                    }
                    if !was_online {
                        refresh.transitions.push(Transition::CameOnline);
                    }
                }
            }
        }

        self.load_error = self.source.error();

        if let Some(transition) = self.monitor.tick(now) {
            refresh.transitions.push(transition);
        }

        for transition in &refresh.transitions {
            self.log_transition(*transition, now);
        }

        refresh
    }

    fn log_transition(&self, transition: Transition, now: Timestamp) {
        match transition {
            Transition::WentOffline { since } => {
                warn!(
                    "{} is offline: no fresh heartbeat for {}",
                    self.source.description(),
                    format_outage(now.duration_since(since))
                );
            }
            Transition::CameOnline => {
                info!("{} is online", self.source.description());
            }
        }
    }

    /// Project the current state for display.
    pub fn report(&self, now: Timestamp) -> StatusReport {
        StatusReport::new(
            &self.monitor,
            self.last_record,
            self.server_count,
            self.source.description(),
            self.load_error.clone(),
            now,
        )
    }

    /// Export the current status to a JSON file.
    pub fn export_state(&self, path: &Path, now: Timestamp) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.report(now))?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
