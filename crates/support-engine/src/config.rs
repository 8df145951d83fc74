use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelConfig, ChannelRegistry};
use crate::error::{Result, SupportError};

/// Support engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportEngineConfig {
    /// Channel selector display settings
    pub channels: ChannelSelectorConfig,

    /// Queue model configuration
    pub queue: QueueConfig,

    /// Unified inbox configuration
    pub inbox: InboxConfig,

    /// Wait-time monitoring configuration
    pub monitoring: MonitoringConfig,
}

/// Channel selector display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelSelectorConfig {
    /// Ordered channels offered to the operator
    pub channels: Vec<ChannelConfig>,

    /// Show live record counts next to each channel
    pub show_counts: bool,

    /// Layout of the selector
    pub variant: SelectorVariant,

    /// Size of the selector entries
    pub size: SelectorSize,
}

/// Selector layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorVariant {
    Horizontal,
    Vertical,
    Grid,
}

/// Selector entry size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorSize {
    Sm,
    Md,
    Lg,
}

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Queue identifier
    pub queue_id: String,

    /// Display name
    pub name: String,

    /// Maximum number of items held at once
    pub max_size: usize,

    /// Presentation order of the items
    pub order: QueueOrder,
}

/// Presentation order of queue items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOrder {
    /// Arrival order of the underlying collection
    Insertion,

    /// Most urgent priority first, longest wait first within a priority
    Priority,
}

/// Unified inbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// Conversations per page
    pub page_size: usize,

    /// Default ordering of the conversation list
    pub default_sort: crate::inbox::InboxSort,
}

/// Wait-time monitoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Seconds between wait-time re-evaluations (0 disables the ticker)
    pub wait_time_tick_secs: u64,
}

impl SupportEngineConfig {
    /// Parse a JSON configuration document; missing sections use defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<()> {
        if self.queue.queue_id.trim().is_empty() {
            return Err(SupportError::config("queue_id cannot be empty"));
        }

        if self.queue.max_size == 0 {
            return Err(SupportError::config("max_size must be greater than 0"));
        }

        if self.inbox.page_size == 0 {
            return Err(SupportError::config("page_size must be greater than 0"));
        }

        if self.channels.channels.is_empty() {
            return Err(SupportError::config("channel list cannot be empty"));
        }

        ChannelRegistry::with_overrides(self.channels.channels.clone())
            .map_err(|e| SupportError::config(e.to_string()))?;

        Ok(())
    }
}

impl Default for SupportEngineConfig {
    fn default() -> Self {
        Self {
            channels: ChannelSelectorConfig::default(),
            queue: QueueConfig::default(),
            inbox: InboxConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl Default for ChannelSelectorConfig {
    fn default() -> Self {
        Self {
            channels: ChannelRegistry::default_channels(),
            show_counts: true,
            variant: SelectorVariant::Horizontal,
            size: SelectorSize::Md,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_id: "support".to_string(),
            name: "Support Queue".to_string(),
            max_size: 500,
            order: QueueOrder::Insertion,
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            default_sort: crate::inbox::InboxSort::Newest,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            wait_time_tick_secs: 60,
        }
    }
}

impl MonitoringConfig {
    /// Ticker period, `None` when re-evaluation is disabled
    pub fn tick_interval(&self) -> Option<Duration> {
        match self.wait_time_tick_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
