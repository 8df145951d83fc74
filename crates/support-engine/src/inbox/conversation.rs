use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::{Result, SupportError};
use crate::types::{ConversationId, IndicatorColor, Priority};

/// Customer on the other side of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Agent a conversation is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Assignee {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }
}

/// Resolution state of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Pending,
    Resolved,
    Closed,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Open => "open",
            ConversationStatus::Pending => "pending",
            ConversationStatus::Resolved => "resolved",
            ConversationStatus::Closed => "closed",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    ///
    /// ```text
    /// open ⇄ pending
    /// open | pending → resolved → open (reopen)
    /// any but closed → closed
    /// ```
    pub fn can_transition_to(&self, next: ConversationStatus) -> bool {
        use ConversationStatus::*;
        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Open, Pending) | (Pending, Open) => true,
            (Open, Resolved) | (Pending, Resolved) => true,
            (Resolved, Open) => true,
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ConversationStatus::Open | ConversationStatus::Pending)
    }
}

/// One customer thread in the unified inbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub ticket_id: String,
    pub subject: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub customer: Customer,
    pub channel: Channel,
    #[serde(default)]
    pub unread_count: u32,
    pub priority: Priority,
    pub status: ConversationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Assignee>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub has_attachments: bool,
    /// Active SLA commitment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_deadline: Option<DateTime<Utc>>,
}

impl Conversation {
    /// New open conversation with no unread messages
    pub fn new(
        id: impl Into<ConversationId>,
        ticket_id: impl Into<String>,
        subject: impl Into<String>,
        customer: Customer,
        channel: Channel,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            ticket_id: ticket_id.into(),
            subject: subject.into(),
            last_message: String::new(),
            last_message_time: Utc::now(),
            customer,
            channel,
            unread_count: 0,
            priority,
            status: ConversationStatus::Open,
            assigned_to: None,
            tags: BTreeSet::new(),
            starred: false,
            has_attachments: false,
            sla_deadline: None,
        }
    }

    pub fn with_last_message(mut self, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.last_message = message.into();
        self.last_message_time = at;
        self
    }

    pub fn with_unread(mut self, count: u32) -> Self {
        self.unread_count = count;
        self
    }

    pub fn with_sla_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.sla_deadline = Some(deadline);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn is_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub fn priority_indicator(&self) -> IndicatorColor {
        self.priority.indicator_color()
    }

    /// Warning annotation for an active SLA commitment
    pub fn sla_annotation(&self) -> Option<String> {
        self.sla_deadline
            .map(|deadline| format!("SLA: {}", deadline.format("%Y-%m-%d %H:%M UTC")))
    }

    /// Whether the SLA deadline has passed at `now`.
    ///
    /// Resolved and closed conversations are never overdue.
    pub fn is_sla_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && self.sla_deadline.map_or(false, |deadline| now > deadline)
    }

    /// Case-insensitive substring match over subject, customer name,
    /// customer email and ticket id. `needle` must already be lowercase.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.subject.to_lowercase().contains(needle)
            || self.customer.name.to_lowercase().contains(needle)
            || self.customer.email.to_lowercase().contains(needle)
            || self.ticket_id.to_lowercase().contains(needle)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.channel.is_filter_only() {
            return Err(SupportError::invalid_input(format!(
                "Conversation {} cannot use the '{}' filter channel",
                self.id, self.channel
            )));
        }
        Ok(())
    }
}
