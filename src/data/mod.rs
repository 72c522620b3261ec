//! Liveness derivation and display helpers.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing of duration strings (e.g., "2m", "500ms") and the
//!   uptime/outage formats shown on status pages
//! - [`monitor`]: The heartbeat staleness monitor ([`Monitor`], [`MonitorState`])
//!
//! ## Data Flow
//!
//! ```text
//! RawHeartbeat (untrusted JSON)
//!        │
//!        ▼
//! Monitor::on_heartbeat()  ── shape check, duplicate suppression
//!        │
//!        ▼
//! Monitor::tick(now)       ── staleness threshold, offline-since
//!        │
//!        ▼
//! StatusReport             ── read-only projection for display
//! ```

pub mod duration;
pub mod monitor;

pub use monitor::{
    Freshness, Monitor, MonitorState, Transition, STALENESS_THRESHOLD, TICK_INTERVAL,
};
