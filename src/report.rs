//! Read-only status projection for presentation layers.
//!
//! A [`StatusReport`] is computed on demand from the monitor, so durations
//! stay accurate no matter how often it is requested.

use chrono::{DateTime, SecondsFormat, Utc};
use pulsewatch_types::{HeartbeatRecord, ServerCount, Timestamp, Verdict};
use serde::Serialize;

use crate::data::duration::{format_outage, format_uptime};
use crate::data::Monitor;

/// Everything a status page shows, at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub verdict: Verdict,
    pub online: bool,
    /// "Operational" or "Down".
    pub badge: &'static str,
    /// "Optimal" or "Degraded".
    pub performance: &'static str,

    /// Start of the current outage, epoch milliseconds.
    pub offline_since_ms: Option<u64>,
    /// Start of the current outage, RFC 3339 UTC.
    pub offline_since: Option<String>,
    pub offline_for_ms: Option<u64>,
    /// Outage length as "{m}m {s}s".
    pub offline_for: Option<String>,

    /// What the process last claimed about itself. Informational only.
    pub reported_online: Option<bool>,
    pub uptime_seconds: Option<u64>,
    /// Uptime as "{d}d {h}h {m}m", "{h}h {m}m {s}s" or "{m}m {s}s".
    pub uptime: Option<String>,
    /// When the uptime counter last changed, epoch milliseconds.
    pub last_fresh_heartbeat_ms: Option<u64>,

    pub server_count: ServerCount,
    pub threshold_secs: u64,
    pub source: String,
    pub source_error: Option<String>,
    pub generated_at: String,
}

impl StatusReport {
    pub fn new(
        monitor: &Monitor,
        last_record: Option<HeartbeatRecord>,
        server_count: ServerCount,
        source: &str,
        source_error: Option<String>,
        now: Timestamp,
    ) -> Self {
        let verdict = monitor.verdict();
        let offline_since = monitor.offline_since();
        let offline_for = monitor.offline_duration(now);

        Self {
            verdict,
            online: verdict.is_online(),
            badge: verdict.badge(),
            performance: verdict.performance(),
            offline_since_ms: offline_since.map(|t| t.as_millis()),
            offline_since: offline_since.and_then(rfc3339),
            offline_for_ms: offline_for.map(|d| d.as_millis() as u64),
            offline_for: offline_for.map(format_outage),
            reported_online: last_record.map(|r| r.online),
            uptime_seconds: last_record.map(|r| r.uptime_seconds),
            uptime: last_record.map(|r| format_uptime(r.uptime_seconds)),
            last_fresh_heartbeat_ms: monitor.state().last_observed_at().map(|t| t.as_millis()),
            server_count,
            threshold_secs: monitor.threshold().as_secs(),
            source: source.to_string(),
            source_error,
            generated_at: rfc3339(now).unwrap_or_default(),
        }
    }

    /// One-line summary for logs and terminals.
    pub fn summary(&self) -> String {
        let mut line = format!("Bot is {} ({})", self.verdict, self.badge);
        if let Some(ref since) = self.offline_since {
            line.push_str(&format!(", offline since {}", since));
        }
        if let Some(ref duration) = self.offline_for {
            line.push_str(&format!(" for {}", duration));
        }
        if let Some(ref uptime) = self.uptime {
            line.push_str(&format!(", uptime {}", uptime));
        }
        line.push_str(&format!(", servers: {}", self.server_count));
        line
    }
}

fn rfc3339(t: Timestamp) -> Option<String> {
    let millis = i64::try_from(t.as_millis()).ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_report_before_first_heartbeat() {
        let monitor = Monitor::new();
        let report = StatusReport::new(&monitor, None, ServerCount::Unknown, "test", None, at(0));

        assert!(!report.online);
        assert_eq!(report.badge, "Down");
        assert_eq!(report.offline_since, None);
        assert_eq!(report.offline_for, None);
        assert_eq!(report.uptime, None);
        assert_eq!(report.threshold_secs, 120);
    }

    #[test]
    fn test_report_while_offline() {
        let mut monitor = Monitor::new();
        let record = HeartbeatRecord::new(true, 3_725);
        monitor.observe(record, at(1_700_000_000_000));
        monitor.tick(at(1_700_000_200_000));

        let report = StatusReport::new(
            &monitor,
            Some(record),
            ServerCount::Known(12),
            "channel: botStatus",
            None,
            at(1_700_000_200_000),
        );

        assert_eq!(report.verdict, Verdict::Offline);
        assert_eq!(report.performance, "Degraded");
        assert_eq!(report.reported_online, Some(true));
        assert_eq!(report.offline_since_ms, Some(1_700_000_000_000));
        assert_eq!(report.offline_since.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(report.offline_for.as_deref(), Some("3m 20s"));
        assert_eq!(report.uptime.as_deref(), Some("1h 2m 5s"));
        assert!(report.summary().starts_with("Bot is Offline (Down), offline since"));
    }

    #[test]
    fn test_report_serializes_unknown_server_count() {
        let monitor = Monitor::new();
        let report = StatusReport::new(&monitor, None, ServerCount::Unknown, "test", None, at(0));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["server_count"], "unknown");
        assert_eq!(json["verdict"], "Offline");
        assert_eq!(json["generated_at"], "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_summary_online() {
        let mut monitor = Monitor::new();
        let record = HeartbeatRecord::new(true, 59);
        monitor.observe(record, at(0));

        let report =
            StatusReport::new(&monitor, Some(record), ServerCount::Known(3), "t", None, at(0));
        assert_eq!(report.summary(), "Bot is Online (Operational), uptime 0m 59s, servers: 3");
    }
}
