use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sla::{format_wait_time, SlaRisk};
use crate::channel::Channel;
use crate::error::SupportError;
use crate::types::{AgentId, ItemId, Priority};

/// Lifecycle state of a queue item
///
/// The assigned agent lives inside the non-waiting variants, so an item has an
/// agent exactly when it is not waiting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueueItemStatus {
    /// Awaiting assignment
    Waiting,

    /// Claimed by an agent who has not started yet
    Assigned { agent: AgentId },

    /// Agent is working on the item
    InProgress { agent: AgentId },
}

/// Flat status tag used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Waiting,
    Assigned,
    InProgress,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Waiting => "waiting",
            StatusKind::Assigned => "assigned",
            StatusKind::InProgress => "in_progress",
        }
    }
}

impl QueueItemStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            QueueItemStatus::Waiting => StatusKind::Waiting,
            QueueItemStatus::Assigned { .. } => StatusKind::Assigned,
            QueueItemStatus::InProgress { .. } => StatusKind::InProgress,
        }
    }

    pub fn assigned_to(&self) -> Option<&AgentId> {
        match self {
            QueueItemStatus::Waiting => None,
            QueueItemStatus::Assigned { agent } | QueueItemStatus::InProgress { agent } => Some(agent),
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, QueueItemStatus::Waiting)
    }
}

/// One pending unit of work in a support queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QueueItemRecord", into = "QueueItemRecord")]
pub struct QueueItem {
    pub id: ItemId,
    pub title: String,
    pub customer: String,
    pub preview: String,
    pub channel: Channel,
    pub priority: Priority,
    pub status: QueueItemStatus,
    /// Minutes elapsed since the item arrived
    pub wait_time: u32,
    pub created_at: DateTime<Utc>,
}

impl QueueItem {
    /// New waiting item that arrived just now
    pub fn new(
        id: impl Into<ItemId>,
        customer: impl Into<String>,
        channel: Channel,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            customer: customer.into(),
            preview: String::new(),
            channel,
            priority,
            status: QueueItemStatus::Waiting,
            wait_time: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = preview.into();
        self
    }

    pub fn with_wait_time(mut self, minutes: u32) -> Self {
        self.wait_time = minutes;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn assigned_to(&self) -> Option<&AgentId> {
        self.status.assigned_to()
    }

    pub fn is_waiting(&self) -> bool {
        self.status.is_waiting()
    }

    pub fn sla_risk(&self) -> SlaRisk {
        SlaRisk::from_wait_time(self.wait_time)
    }

    pub fn formatted_wait_time(&self) -> String {
        format_wait_time(self.wait_time)
    }
}

/// Wire form of a queue item as produced by the intake system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    pub customer: String,
    #[serde(default)]
    pub preview: String,
    pub channel: Channel,
    pub priority: Priority,
    pub status: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AgentId>,
    #[serde(default)]
    pub wait_time: u32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<QueueItemRecord> for QueueItem {
    type Error = SupportError;

    fn try_from(record: QueueItemRecord) -> Result<Self, Self::Error> {
        if record.channel.is_filter_only() {
            return Err(SupportError::invalid_input(format!(
                "Queue item {} cannot use the '{}' filter channel",
                record.id, record.channel
            )));
        }

        let status = match (record.status, record.assigned_to) {
            (StatusKind::Waiting, None) => QueueItemStatus::Waiting,
            (StatusKind::Assigned, Some(agent)) => QueueItemStatus::Assigned { agent },
            (StatusKind::InProgress, Some(agent)) => QueueItemStatus::InProgress { agent },
            (StatusKind::Waiting, Some(agent)) => {
                return Err(SupportError::invalid_input(format!(
                    "Queue item {} is waiting but assigned to {}",
                    record.id, agent
                )))
            }
            (kind, None) => {
                return Err(SupportError::invalid_input(format!(
                    "Queue item {} is {} without an assignee",
                    record.id,
                    kind.as_str()
                )))
            }
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            customer: record.customer,
            preview: record.preview,
            channel: record.channel,
            priority: record.priority,
            status,
            wait_time: record.wait_time,
            created_at: record.created_at,
        })
    }
}

impl From<QueueItem> for QueueItemRecord {
    fn from(item: QueueItem) -> Self {
        Self {
            status: item.status.kind(),
            assigned_to: item.status.assigned_to().cloned(),
            id: item.id,
            title: item.title,
            customer: item.customer,
            preview: item.preview,
            channel: item.channel,
            priority: item.priority,
            wait_time: item.wait_time,
            created_at: item.created_at,
        }
    }
}
