use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::style::{channel_icon, channel_label, channel_style, ChannelStyle};
use super::Channel;
use crate::error::{Result, SupportError};

/// Display and selection metadata for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub channel: Channel,
    pub label: String,
    pub icon: String,
    pub style: ChannelStyle,
    /// Live number of records on this channel, when the host shows counts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ChannelConfig {
    /// Default metadata for a channel
    pub fn for_channel(channel: Channel) -> Self {
        Self {
            channel,
            label: channel_label(channel).to_string(),
            icon: channel_icon(channel).to_string(),
            style: channel_style(channel),
            count: None,
        }
    }
}

/// Ordered set of channels offered to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRegistry {
    channels: Vec<ChannelConfig>,
}

impl ChannelRegistry {
    /// Registry holding the default ordered channel list
    pub fn new() -> Self {
        Self {
            channels: Self::default_channels(),
        }
    }

    /// Registry holding a caller supplied replacement list
    pub fn with_overrides(channels: Vec<ChannelConfig>) -> Result<Self> {
        let mut seen = HashSet::new();
        for config in &channels {
            if !seen.insert(config.channel) {
                return Err(SupportError::invalid_input(format!(
                    "Channel listed twice: {}",
                    config.channel
                )));
            }
        }
        debug!("📡 Channel registry overridden with {} entries", channels.len());
        Ok(Self { channels })
    }

    /// `all` first, then every concrete channel in canonical order
    pub fn default_channels() -> Vec<ChannelConfig> {
        Channel::ORDERED
            .iter()
            .map(|channel| ChannelConfig::for_channel(*channel))
            .collect()
    }

    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    /// Look up the entry for a channel
    pub fn get(&self, channel: Channel) -> Option<&ChannelConfig> {
        self.channels.iter().find(|config| config.channel == channel)
    }

    /// Entries annotated with live counts.
    ///
    /// Concrete channels take their count from `counts` (missing means 0);
    /// the `all` entry carries the sum over every channel.
    pub fn with_counts(&self, counts: &HashMap<Channel, usize>) -> Vec<ChannelConfig> {
        let total: usize = counts
            .iter()
            .filter(|(channel, _)| !channel.is_filter_only())
            .map(|(_, count)| *count)
            .sum();

        self.channels
            .iter()
            .map(|config| {
                let count = if config.channel.is_filter_only() {
                    total
                } else {
                    counts.get(&config.channel).copied().unwrap_or(0)
                };
                ChannelConfig {
                    count: Some(count),
                    ..config.clone()
                }
            })
            .collect()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered channel list: the defaults, or `overrides` as a full replacement.
///
/// A channel listed more than once in `overrides` keeps its first entry.
pub fn list_channels(overrides: Option<&[ChannelConfig]>) -> Vec<ChannelConfig> {
    let Some(channels) = overrides else {
        return ChannelRegistry::default_channels();
    };

    let mut seen = HashSet::new();
    channels
        .iter()
        .filter(|config| {
            let first = seen.insert(config.channel);
            if !first {
                warn!("📡 Ignoring repeated channel entry: {}", config.channel);
            }
            first
        })
        .cloned()
        .collect()
}

/// Whether `channel` is the active filter
pub fn is_selected(channel: Channel, selected: Channel) -> bool {
    channel == selected
}
