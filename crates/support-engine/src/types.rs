//! # Shared Type Definitions
//!
//! Identifier newtypes and the priority scale shared by the queue model and
//! the unified inbox. Ids are opaque strings handed over by the external
//! intake system; the engine never parses them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a queue item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

/// Identifier of an inbox conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

/// Identifier of a support agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(ItemId);
string_id!(ConversationId);
string_id!(AgentId);

/// Interaction priority
///
/// Variants are declared from least to most urgent so the derived `Ord`
/// gives `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Every priority, most urgent first
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Indicator color shown next to an item of this priority
    pub fn indicator_color(&self) -> IndicatorColor {
        match self {
            Priority::Critical => IndicatorColor::Red,
            Priority::High => IndicatorColor::Orange,
            Priority::Medium => IndicatorColor::Yellow,
            Priority::Low => IndicatorColor::Green,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed indicator palette for priorities and SLA risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Red,
    Orange,
    Yellow,
    Green,
    Gray,
}

impl IndicatorColor {
    /// Background utility class for the indicator dot
    pub fn css_class(&self) -> &'static str {
        match self {
            IndicatorColor::Red => "bg-red-500",
            IndicatorColor::Orange => "bg-orange-500",
            IndicatorColor::Yellow => "bg-yellow-500",
            IndicatorColor::Green => "bg-green-500",
            IndicatorColor::Gray => "bg-gray-400",
        }
    }
}
