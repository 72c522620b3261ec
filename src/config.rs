//! Layered settings.
//!
//! Defaults, then an optional TOML file, then `PULSEWATCH_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `PULSEWATCH_SERVER_COUNT__ROOT=/var/lib/bot/docs`.
//!
//! ```toml
//! threshold = "2m"
//! tick = "1s"
//! key = "botStatus"
//!
//! [server_count]
//! root = "/var/lib/bot/docs"
//! document = "botStats/serverCount"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::{STALENESS_THRESHOLD, TICK_INTERVAL};
use crate::server_count::SERVER_COUNT_DOCUMENT;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PULSEWATCH";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Staleness threshold, e.g. "2m".
    pub threshold: Option<String>,
    /// Tick period, e.g. "1s".
    pub tick: Option<String>,
    /// Store key the heartbeat is published under.
    pub key: String,
    pub server_count: ServerCountSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerCountSettings {
    /// Directory backing the document store. No read is made without one.
    pub root: Option<PathBuf>,
    pub document: String,
}

impl Settings {
    /// Load settings, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("key", "botStatus")?
            .set_default("server_count.document", SERVER_COUNT_DOCUMENT)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to load configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    /// The staleness threshold, two minutes unless configured.
    pub fn threshold(&self) -> Result<Duration> {
        match self.threshold {
            Some(ref s) => parse_duration(s).with_context(|| format!("Invalid threshold: {}", s)),
            None => Ok(STALENESS_THRESHOLD),
        }
    }

    /// The tick period, one second unless configured.
    pub fn tick(&self) -> Result<Duration> {
        let tick = match self.tick {
            Some(ref s) => parse_duration(s).with_context(|| format!("Invalid tick: {}", s))?,
            None => TICK_INTERVAL,
        };
        anyhow::ensure!(!tick.is_zero(), "Tick period must be greater than zero");
        Ok(tick)
    }
}
