//! SLA risk classification and wait-time formatting
//!
//! Risk is derived from the wait time alone. The thresholds are fixed:
//!
//! | wait time (minutes) | risk       | indicator |
//! |---------------------|------------|-----------|
//! | `0..=15`            | `Normal`   | green     |
//! | `16..=30`           | `Elevated` | orange    |
//! | `> 30`              | `Breach`   | red       |

use serde::{Deserialize, Serialize};

use crate::types::IndicatorColor;

/// Wait time above which an item is at risk of breaching its SLA
pub const SLA_BREACH_THRESHOLD_MINUTES: u32 = 30;

/// Wait time above which an item is flagged as elevated risk
pub const SLA_ELEVATED_THRESHOLD_MINUTES: u32 = 15;

/// SLA risk level of a waiting interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaRisk {
    Normal,
    Elevated,
    Breach,
}

impl SlaRisk {
    /// Classify a wait time given in minutes
    pub fn from_wait_time(wait_minutes: u32) -> Self {
        if wait_minutes > SLA_BREACH_THRESHOLD_MINUTES {
            SlaRisk::Breach
        } else if wait_minutes > SLA_ELEVATED_THRESHOLD_MINUTES {
            SlaRisk::Elevated
        } else {
            SlaRisk::Normal
        }
    }

    pub fn is_breach_risk(&self) -> bool {
        matches!(self, SlaRisk::Breach)
    }

    pub fn indicator_color(&self) -> IndicatorColor {
        match self {
            SlaRisk::Normal => IndicatorColor::Green,
            SlaRisk::Elevated => IndicatorColor::Orange,
            SlaRisk::Breach => IndicatorColor::Red,
        }
    }

    /// Warning text surfaced next to breach-risk items
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            SlaRisk::Breach => Some("SLA breach risk"),
            _ => None,
        }
    }
}

/// Render minutes as `"{m}m"` below an hour and `"{h}h {m}m"` otherwise
pub fn format_wait_time(minutes: u32) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wait_time() {
        assert_eq!(format_wait_time(0), "0m");
        assert_eq!(format_wait_time(45), "45m");
        assert_eq!(format_wait_time(59), "59m");
        assert_eq!(format_wait_time(60), "1h 0m");
        assert_eq!(format_wait_time(90), "1h 30m");
        assert_eq!(format_wait_time(605), "10h 5m");
    }

    #[test]
    fn test_breach_boundary_is_exclusive() {
        assert_eq!(SlaRisk::from_wait_time(30), SlaRisk::Elevated);
        assert_eq!(SlaRisk::from_wait_time(31), SlaRisk::Breach);
        assert!(!SlaRisk::from_wait_time(30).is_breach_risk());
        assert!(SlaRisk::from_wait_time(31).is_breach_risk());
    }

    #[test]
    fn test_elevated_boundary_is_exclusive() {
        assert_eq!(SlaRisk::from_wait_time(0), SlaRisk::Normal);
        assert_eq!(SlaRisk::from_wait_time(15), SlaRisk::Normal);
        assert_eq!(SlaRisk::from_wait_time(16), SlaRisk::Elevated);
    }

    #[test]
    fn test_risk_presentation() {
        assert_eq!(SlaRisk::Elevated.indicator_color(), IndicatorColor::Orange);
        assert_eq!(SlaRisk::Breach.indicator_color(), IndicatorColor::Red);
        assert!(SlaRisk::Breach.warning().is_some());
        assert!(SlaRisk::Elevated.warning().is_none());
    }
}
