//! Look-back horizons for windowed history views.

use core::fmt;
use core::str::FromStr;

use chrono::Duration;

/// A named look-back horizon for filtering historical series.
///
/// `Live` is count-bounded (the most recent N points regardless of age);
/// the remaining horizons are time-bounded with an inclusive boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Horizon {
    Live,
    #[cfg_attr(feature = "serde", serde(rename = "24h"))]
    Hours24,
    #[cfg_attr(feature = "serde", serde(rename = "7d"))]
    Days7,
    #[cfg_attr(feature = "serde", serde(rename = "15d"))]
    Days15,
    #[cfg_attr(feature = "serde", serde(rename = "30d"))]
    Days30,
}

impl Horizon {
    /// All horizons, in display order.
    pub const ALL: [Horizon; 5] = [
        Horizon::Live,
        Horizon::Hours24,
        Horizon::Days7,
        Horizon::Days15,
        Horizon::Days30,
    ];

    /// The look-back duration, or `None` for the count-bounded live window.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Horizon::Live => None,
            Horizon::Hours24 => Some(Duration::hours(24)),
            Horizon::Days7 => Some(Duration::days(7)),
            Horizon::Days15 => Some(Duration::days(15)),
            Horizon::Days30 => Some(Duration::days(30)),
        }
    }

    /// Short display label ("live", "24h", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Live => "live",
            Horizon::Hours24 => "24h",
            Horizon::Days7 => "7d",
            Horizon::Days15 => "15d",
            Horizon::Days30 => "30d",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Horizon::Live),
            "24h" => Ok(Horizon::Hours24),
            "7d" => Ok(Horizon::Days7),
            "15d" => Ok(Horizon::Days15),
            "30d" => Ok(Horizon::Days30),
            other => Err(format!("unknown horizon: {}", other)),
        }
    }
}
