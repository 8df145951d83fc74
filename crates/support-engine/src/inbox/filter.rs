use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conversation::{Conversation, ConversationStatus};
use crate::channel::Channel;
use crate::types::Priority;

/// Ordering of the conversation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxSort {
    /// Most recent message first
    Newest,

    /// Most urgent priority first, newest first within a priority
    Priority,
}

/// Criteria narrowing the conversation list; every set field must match
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxFilter {
    pub query: String,
    /// `None` and `Some(Channel::All)` both mean "any channel"
    pub channel: Option<Channel>,
    pub status: Option<ConversationStatus>,
    pub priority: Option<Priority>,
    /// Exact assignee name
    pub assignee: Option<String>,
    pub tag: Option<String>,
    pub starred_only: bool,
    pub unread_only: bool,
    /// Only conversations carrying an SLA deadline
    pub sla_only: bool,
    /// Only active conversations whose SLA deadline passed at this instant
    pub overdue_at: Option<DateTime<Utc>>,
}

impl InboxFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_status(mut self, status: ConversationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        self.assignee = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn starred(mut self) -> Self {
        self.starred_only = true;
        self
    }

    pub fn unread(mut self) -> Self {
        self.unread_only = true;
        self
    }

    pub fn with_sla_only(mut self) -> Self {
        self.sla_only = true;
        self
    }

    pub fn sla_overdue_at(mut self, now: DateTime<Utc>) -> Self {
        self.overdue_at = Some(now);
        self
    }

    pub fn matches(&self, conversation: &Conversation) -> bool {
        let needle = self.query.trim().to_lowercase();
        conversation.matches_query(&needle)
            && self.channel.map_or(true, |c| c.admits(conversation.channel))
            && self.status.map_or(true, |s| conversation.status == s)
            && self.priority.map_or(true, |p| conversation.priority == p)
            && self.assignee.as_ref().map_or(true, |name| {
                conversation
                    .assigned_to
                    .as_ref()
                    .map_or(false, |assignee| &assignee.name == name)
            })
            && self.tag.as_ref().map_or(true, |tag| conversation.tags.contains(tag))
            && (!self.starred_only || conversation.starred)
            && (!self.unread_only || conversation.is_unread())
            && (!self.sla_only || conversation.sla_deadline.is_some())
            && self.overdue_at.map_or(true, |now| conversation.is_sla_overdue(now))
    }
}

/// Sort conversations in place
pub fn sort_conversations(conversations: &mut [&Conversation], sort: InboxSort) {
    match sort {
        InboxSort::Newest => {
            conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time))
        }
        InboxSort::Priority => conversations.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.last_message_time.cmp(&a.last_message_time))
        }),
    }
}

/// One page of a list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into 1-based pages of `per_page` entries.
///
/// Page numbers past the end are clamped to the last page; `per_page` of 0
/// is treated as 1.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = (total_items + per_page - 1) / per_page;
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;

    Page {
        items: items.into_iter().skip(start).take(per_page).collect(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}
