//! Channel registry module
//!
//! This module enumerates the communication channels an interaction can
//! arrive through, together with their display metadata (label, icon, color
//! classes) and the selection rule shared by the queue and the inbox.

pub mod registry;
pub mod style;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SupportError;

pub use registry::{is_selected, list_channels, ChannelConfig, ChannelRegistry};
pub use style::{channel_icon, channel_label, channel_style, channel_style_for_key, ChannelStyle};

/// Communication channel of an interaction
///
/// `All` is a filter value meaning "no channel filter applied". It is never
/// the channel of a real queue item or conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    All,
    Email,
    Chat,
    Phone,
    Sms,
    WhatsApp,
    Facebook,
    Twitter,
    WebChat,
    Video,
}

impl Channel {
    /// Canonical selector order: `All` first, then every concrete channel
    pub const ORDERED: [Channel; 10] = [
        Channel::All,
        Channel::Email,
        Channel::Chat,
        Channel::Phone,
        Channel::Sms,
        Channel::WhatsApp,
        Channel::Facebook,
        Channel::Twitter,
        Channel::WebChat,
        Channel::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::All => "all",
            Channel::Email => "email",
            Channel::Chat => "chat",
            Channel::Phone => "phone",
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
            Channel::Facebook => "facebook",
            Channel::Twitter => "twitter",
            Channel::WebChat => "webchat",
            Channel::Video => "video",
        }
    }

    /// True for the `All` filter value
    pub fn is_filter_only(&self) -> bool {
        matches!(self, Channel::All)
    }

    /// Whether a record on `record_channel` passes this channel used as a filter
    pub fn admits(&self, record_channel: Channel) -> bool {
        self.is_filter_only() || *self == record_channel
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ORDERED
            .iter()
            .copied()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SupportError::invalid_input(format!("Unknown channel: {}", s)))
    }
}
