//! Shape checking for raw heartbeat records.
//!
//! Records arrive from the backing store as loosely-typed JSON maps. This
//! module decides whether a map is trustworthy enough to become a
//! [`HeartbeatRecord`]; anything that fails the check is treated as if no
//! heartbeat had arrived.

use pulsewatch_types::HeartbeatRecord;
use serde_json::{Map, Value};

/// A heartbeat exactly as received, before any validation.
pub type RawHeartbeat = Value;

/// Field holding the self-reported liveness flag.
pub const ONLINE_FIELD: &str = "online";

/// Field holding the uptime counter.
pub const UPTIME_FIELD: &str = "uptimeSeconds";

/// Validate a raw record.
///
/// Returns `None` unless the value is an object with a boolean-ish `online`
/// field and a number-ish, non-negative, integral `uptimeSeconds` field.
pub fn parse_record(raw: &RawHeartbeat) -> Option<HeartbeatRecord> {
    let map = raw.as_object()?;
    let online = online_flag(map)?;
    let uptime_seconds = uptime(map)?;
    Some(HeartbeatRecord::new(online, uptime_seconds))
}

fn online_flag(map: &Map<String, Value>) -> Option<bool> {
    match map.get(ONLINE_FIELD)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()),
        _ => None,
    }
}

fn uptime(map: &Map<String, Value>) -> Option<u64> {
    match map.get(UPTIME_FIELD)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_seconds)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(integral_seconds))
        }
        _ => None,
    }
}

/// Accept floats like `42.0` but reject fractions, negatives and non-finite
/// values, since two distinct fractional uptimes must never compare equal.
fn integral_seconds(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
