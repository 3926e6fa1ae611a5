//! Risk enumerations used throughout a hazard report.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// Severity of a hazard or of the report as a whole.
///
/// `Unknown` is a sentinel for missing or invalid input and sits outside the
/// severity order: it compares equal to itself and unordered against every
/// other level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Every level, ordered from least to most severe, followed by `Unknown`.
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
        RiskLevel::Unknown,
    ];

    /// Returns the wire label for this level.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Looks up a level by its exact label.
    ///
    /// Matching is case-sensitive and does not trim: `"High"` and `" high"`
    /// are not levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use hazard_report::report::RiskLevel;
    ///
    /// assert_eq!(RiskLevel::from_label("critical"), Some(RiskLevel::Critical));
    /// assert_eq!(RiskLevel::from_label("extreme"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == label)
    }

    /// Position in the severity order, or `None` for `Unknown`.
    #[inline]
    pub const fn severity(self) -> Option<u8> {
        match self {
            RiskLevel::Low => Some(1),
            RiskLevel::Medium => Some(2),
            RiskLevel::High => Some(3),
            RiskLevel::Critical => Some(4),
            RiskLevel::Unknown => None,
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How easily an object moves (in wind) or falls.
///
/// Narrower than [`RiskLevel`]: there is no `critical` mobility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementRisk {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

/// Fall risk of an elevated object; shares the movement scale.
pub type FallRisk = MovementRisk;

impl MovementRisk {
    /// Every value in declaration order.
    pub const ALL: [MovementRisk; 4] = [
        MovementRisk::High,
        MovementRisk::Medium,
        MovementRisk::Low,
        MovementRisk::Unknown,
    ];

    /// Returns the wire label for this value.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            MovementRisk::High => "high",
            MovementRisk::Medium => "medium",
            MovementRisk::Low => "low",
            MovementRisk::Unknown => "unknown",
        }
    }

    /// Looks up a value by its exact, case-sensitive label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|risk| risk.as_str() == label)
    }
}

impl fmt::Display for MovementRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
