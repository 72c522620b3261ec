//! Derived liveness verdict.

/// Liveness as derived by a monitor, as opposed to the flag a process
/// reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Online,
    #[default]
    Offline,
}

impl Verdict {
    pub const fn is_online(&self) -> bool {
        matches!(self, Verdict::Online)
    }

    /// "Online" or "Offline".
    pub const fn label(&self) -> &'static str {
        match self {
            Verdict::Online => "Online",
            Verdict::Offline => "Offline",
        }
    }

    /// Short status badge for display.
    pub const fn badge(&self) -> &'static str {
        match self {
            Verdict::Online => "Operational",
            Verdict::Offline => "Down",
        }
    }

    pub const fn performance(&self) -> &'static str {
        match self {
            Verdict::Online => "Optimal",
            Verdict::Offline => "Degraded",
        }
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_offline() {
        assert_eq!(Verdict::default(), Verdict::Offline);
        assert!(!Verdict::default().is_online());
    }

    #[test]
    fn labels() {
        assert_eq!(Verdict::Online.label(), "Online");
        assert_eq!(Verdict::Online.badge(), "Operational");
        assert_eq!(Verdict::Offline.performance(), "Degraded");
    }
}
