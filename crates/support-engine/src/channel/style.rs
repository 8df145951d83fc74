use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Channel;

/// Text and background color classes for a channel badge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelStyle {
    pub text: String,
    pub background: String,
}

impl ChannelStyle {
    fn new(text: &str, background: &str) -> Self {
        Self {
            text: text.to_string(),
            background: background.to_string(),
        }
    }
}

/// Badge colors for a channel
pub fn channel_style(channel: Channel) -> ChannelStyle {
    match channel {
        Channel::All => ChannelStyle::new("text-gray-700", "bg-gray-100"),
        Channel::Email => ChannelStyle::new("text-blue-600", "bg-blue-100"),
        Channel::Chat => ChannelStyle::new("text-green-600", "bg-green-100"),
        Channel::Phone => ChannelStyle::new("text-purple-600", "bg-purple-100"),
        Channel::Sms => ChannelStyle::new("text-orange-600", "bg-orange-100"),
        Channel::WhatsApp => ChannelStyle::new("text-emerald-600", "bg-emerald-100"),
        Channel::Facebook => ChannelStyle::new("text-indigo-600", "bg-indigo-100"),
        Channel::Twitter => ChannelStyle::new("text-sky-600", "bg-sky-100"),
        Channel::WebChat => ChannelStyle::new("text-teal-600", "bg-teal-100"),
        Channel::Video => ChannelStyle::new("text-red-600", "bg-red-100"),
    }
}

/// Icon reference (lucide icon name) for a channel
pub fn channel_icon(channel: Channel) -> &'static str {
    match channel {
        Channel::All => "inbox",
        Channel::Email => "mail",
        Channel::Chat => "message-circle",
        Channel::Phone => "phone",
        Channel::Sms => "message-square",
        Channel::WhatsApp => "smartphone",
        Channel::Facebook => "facebook",
        Channel::Twitter => "twitter",
        Channel::WebChat => "globe",
        Channel::Video => "video",
    }
}

/// Human readable label for a channel
pub fn channel_label(channel: Channel) -> &'static str {
    match channel {
        Channel::All => "All Channels",
        Channel::Email => "Email",
        Channel::Chat => "Live Chat",
        Channel::Phone => "Phone",
        Channel::Sms => "SMS",
        Channel::WhatsApp => "WhatsApp",
        Channel::Facebook => "Facebook",
        Channel::Twitter => "Twitter",
        Channel::WebChat => "Web Chat",
        Channel::Video => "Video",
    }
}

/// Badge colors for a raw channel key coming from an untyped source.
///
/// Unknown keys get the generic `all` styling.
pub fn channel_style_for_key(key: &str) -> ChannelStyle {
    match key.parse::<Channel>() {
        Ok(channel) => channel_style(channel),
        Err(_) => {
            warn!("🎨 Unknown channel key '{}', using generic styling", key);
            channel_style(Channel::All)
        }
    }
}
