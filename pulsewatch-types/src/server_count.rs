//! Server count as read from the document store.

/// Number of servers the bot is installed in.
///
/// A missing or malformed count is `Unknown`; it is never reported as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServerCount {
    Known(u64),
    #[default]
    Unknown,
}

impl ServerCount {
    pub const fn known(&self) -> Option<u64> {
        match self {
            ServerCount::Known(n) => Some(*n),
            ServerCount::Unknown => None,
        }
    }
}

impl From<Option<u64>> for ServerCount {
    fn from(value: Option<u64>) -> Self {
        value.map_or(ServerCount::Unknown, ServerCount::Known)
    }
}

impl core::fmt::Display for ServerCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ServerCount::Known(n) => write!(f, "{}", n),
            ServerCount::Unknown => f.write_str("unknown"),
        }
    }
}
