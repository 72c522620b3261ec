//! Wall-clock timestamps.
//!
//! Milliseconds since the Unix epoch are the canonical unit, matching what
//! heartbeat publishers and browsers report.

use core::time::Duration;

/// A wall-clock instant in milliseconds since the Unix epoch.
///
/// Unlike `std::time::Instant` this can be constructed from plain numbers,
/// which keeps staleness logic deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create from milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// The current wall-clock time.
    ///
    /// A system clock set before 1970 reads as the epoch.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    pub const fn duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// `self + duration`, or `None` on overflow.
    pub fn checked_add(&self, duration: Duration) -> Option<Timestamp> {
        let millis = u64::try_from(duration.as_millis()).ok()?;
        self.0.checked_add(millis).map(Timestamp)
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let t = Timestamp::from_secs(3);
        assert_eq!(t.as_millis(), 3000);
        assert_eq!(Timestamp::from(250u64), Timestamp::from_millis(250));
    }

    #[test]
    fn duration_since_saturates() {
        let a = Timestamp::from_millis(1_000);
        let b = Timestamp::from_millis(121_000);
        assert_eq!(b.duration_since(a), Duration::from_secs(120));
        assert_eq!(a.duration_since(b), Duration::ZERO);
    }

    #[test]
    fn checked_add() {
        let t = Timestamp::from_millis(500);
        assert_eq!(
            t.checked_add(Duration::from_millis(1500)),
            Some(Timestamp::from_millis(2000))
        );
        assert_eq!(Timestamp(u64::MAX).checked_add(Duration::from_millis(1)), None);
    }

    #[test]
    fn ordering() {
        assert!(Timestamp::EPOCH < Timestamp::from_millis(1));
        assert_eq!(Timestamp::default(), Timestamp::EPOCH);
    }

    #[cfg(feature = "std")]
    #[test]
    fn now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(Timestamp::now() > Timestamp::from_secs(1_577_836_800));
    }
}
