use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::item::{QueueItem, QueueItemStatus};
use crate::channel::Channel;
use crate::config::{QueueConfig, QueueOrder};
use crate::error::{Result, SupportError};
use crate::monitoring::{SupportEventHandler, TracingEventHandler};
use crate::types::{AgentId, ItemId};

/// Support queue manager
///
/// Holds the items of a single queue in arrival order and enforces the
/// `waiting → assigned → in_progress` state machine. Every operation is
/// all-or-nothing: on error the collection is left exactly as it was.
pub struct QueueManager {
    queue_id: String,
    name: String,
    max_size: usize,
    order: QueueOrder,
    items: Vec<QueueItem>,
    events: Arc<dyn SupportEventHandler>,
}

impl QueueManager {
    /// Create an empty queue
    pub fn new(queue_id: impl Into<String>, name: impl Into<String>) -> Self {
        let defaults = QueueConfig::default();
        let queue_id = queue_id.into();
        let name = name.into();
        info!("📋 Creating queue: {} ({})", name, queue_id);

        Self {
            queue_id,
            name,
            max_size: defaults.max_size,
            order: defaults.order,
            items: Vec::new(),
            events: Arc::new(TracingEventHandler),
        }
    }

    /// Create an empty queue from configuration
    pub fn from_config(config: &QueueConfig) -> Self {
        Self::new(config.queue_id.clone(), config.name.clone())
            .with_max_size(config.max_size)
            .with_order(config.order)
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_order(mut self, order: QueueOrder) -> Self {
        self.order = order;
        self
    }

    /// Register the host hooks
    pub fn with_events(mut self, events: Arc<dyn SupportEventHandler>) -> Self {
        self.events = events;
        self
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Items in arrival order
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&QueueItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.get(item_id).is_some()
    }

    /// Admit a new item; returns the queue length afterwards
    pub fn enqueue(&mut self, item: QueueItem) -> Result<usize> {
        self.check_admissible(&item)?;

        if self.items.len() >= self.max_size {
            return Err(SupportError::invalid_state(format!(
                "Queue {} is full ({} items)",
                self.queue_id, self.max_size
            )));
        }

        info!(
            "📞 Enqueuing item {} to queue {} (channel: {}, priority: {})",
            item.id, self.queue_id, item.channel, item.priority
        );
        self.items.push(item);
        debug!("📊 Queue {} size: {} items", self.queue_id, self.items.len());
        Ok(self.items.len())
    }

    /// Admit a batch of items; either all of them are added or none
    pub fn enqueue_all(&mut self, items: Vec<QueueItem>) -> Result<usize> {
        let mut batch_ids = HashSet::new();
        for item in &items {
            self.check_admissible(item)?;
            if !batch_ids.insert(item.id.clone()) {
                return Err(SupportError::already_exists(format!(
                    "Queue item {} appears twice in batch",
                    item.id
                )));
            }
        }

        if self.items.len() + items.len() > self.max_size {
            return Err(SupportError::invalid_state(format!(
                "Queue {} cannot take {} more items (max {})",
                self.queue_id,
                items.len(),
                self.max_size
            )));
        }

        info!("📥 Enqueuing {} items to queue {}", items.len(), self.queue_id);
        self.items.extend(items);
        Ok(self.items.len())
    }

    /// `waiting → assigned`, then `on_assign`
    pub fn assign(&mut self, item_id: &ItemId, agent_id: AgentId) -> Result<&QueueItem> {
        let index = self.claim(item_id, agent_id)?;
        let item = &self.items[index];
        if let Some(agent) = item.status.assigned_to() {
            self.events.on_assign(item_id, agent);
        }
        Ok(item)
    }

    /// The `waiting → assigned` transition without the hook; returns the
    /// item's index
    pub(crate) fn claim(&mut self, item_id: &ItemId, agent_id: AgentId) -> Result<usize> {
        let index = self.position(item_id)?;
        let item = &mut self.items[index];

        if let Some(current) = item.status.assigned_to() {
            warn!(
                "🚫 Item {} already assigned to {}, rejecting assignment to {}",
                item_id, current, agent_id
            );
            return Err(SupportError::invalid_state(format!(
                "Queue item {} is {}, expected waiting",
                item_id,
                item.status.kind().as_str()
            )));
        }

        info!("👤 Assigning item {} to agent {}", item_id, agent_id);
        item.status = QueueItemStatus::Assigned { agent: agent_id };
        Ok(index)
    }

    /// `assigned → in_progress`
    pub fn start_work(&mut self, item_id: &ItemId) -> Result<&QueueItem> {
        let index = self.position(item_id)?;
        let item = &mut self.items[index];

        let agent = match &item.status {
            QueueItemStatus::Assigned { agent } => agent.clone(),
            other => {
                return Err(SupportError::invalid_state(format!(
                    "Queue item {} is {}, expected assigned",
                    item_id,
                    other.kind().as_str()
                )))
            }
        };

        info!("🛠️ Agent {} started work on item {}", agent, item_id);
        item.status = QueueItemStatus::InProgress { agent };
        Ok(&self.items[index])
    }

    /// Remove a resolved item from the queue (terminal transition)
    pub fn resolve(&mut self, item_id: &ItemId) -> Result<QueueItem> {
        let index = self.position(item_id)?;
        let item = self.items.remove(index);
        info!(
            "✅ Resolved item {} from queue {} (was {}, remaining: {})",
            item_id,
            self.queue_id,
            item.status.kind().as_str(),
            self.items.len()
        );
        Ok(item)
    }

    /// Operator opened an item
    pub fn click(&self, item_id: &ItemId) -> Result<&QueueItem> {
        let item = self.find(item_id)?;
        self.events.on_item_click(item);
        Ok(item)
    }

    /// Like [`QueueManager::get`], but a missing item is `NotFound`
    pub(crate) fn find(&self, item_id: &ItemId) -> Result<&QueueItem> {
        self.get(item_id)
            .ok_or_else(|| SupportError::not_found(format!("Queue item not found: {}", item_id)))
    }

    /// Registered host hooks
    pub(crate) fn events(&self) -> Arc<dyn SupportEventHandler> {
        self.events.clone()
    }

    /// Statistics over the live item set
    pub fn stats(&self) -> QueueStats {
        QueueStats::compute(&self.items)
    }

    /// Items ordered by priority (most urgent first), then by wait time
    /// (longest first). The stored arrival order is not changed.
    pub fn prioritized(&self) -> Vec<&QueueItem> {
        let mut items: Vec<&QueueItem> = self.items.iter().collect();
        // stable sort keeps arrival order for full ties
        items.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.wait_time.cmp(&a.wait_time))
        });
        items
    }

    /// Items in the configured presentation order
    pub fn display_order(&self) -> Vec<&QueueItem> {
        match self.order {
            QueueOrder::Insertion => self.items.iter().collect(),
            QueueOrder::Priority => self.prioritized(),
        }
    }

    /// Most urgent waiting item, the natural next pick for an agent
    pub fn next_waiting(&self) -> Option<&QueueItem> {
        self.prioritized().into_iter().find(|item| item.is_waiting())
    }

    /// Waiting items past the breach threshold
    pub fn at_risk(&self) -> Vec<&QueueItem> {
        self.items
            .iter()
            .filter(|item| item.is_waiting() && item.sla_risk().is_breach_risk())
            .collect()
    }

    /// Items on a channel; `Channel::All` returns every item
    pub fn by_channel(&self, channel: Channel) -> Vec<&QueueItem> {
        self.items
            .iter()
            .filter(|item| channel.admits(item.channel))
            .collect()
    }

    /// Number of items per concrete channel
    pub fn channel_counts(&self) -> HashMap<Channel, usize> {
        let mut counts = HashMap::new();
        for item in &self.items {
            *counts.entry(item.channel).or_insert(0) += 1;
        }
        counts
    }

    /// Recompute the wait time of waiting items from their arrival time.
    ///
    /// Wait time never decreases; items already claimed keep the wait time
    /// they had when assigned. Returns the number of items updated.
    pub fn refresh_wait_times(&mut self, now: DateTime<Utc>) -> usize {
        let mut updated = 0;
        for item in self.items.iter_mut().filter(|item| item.is_waiting()) {
            let elapsed = now.signed_duration_since(item.created_at).num_minutes();
            let elapsed = u32::try_from(elapsed.max(0)).unwrap_or(u32::MAX);
            if elapsed > item.wait_time {
                item.wait_time = elapsed;
                updated += 1;
            }
        }

        if updated > 0 {
            debug!("⏱️ Refreshed wait time of {} items in queue {}", updated, self.queue_id);
        }
        updated
    }

    fn position(&self, item_id: &ItemId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| &item.id == item_id)
            .ok_or_else(|| SupportError::not_found(format!("Queue item not found: {}", item_id)))
    }

    fn check_admissible(&self, item: &QueueItem) -> Result<()> {
        if item.channel.is_filter_only() {
            return Err(SupportError::invalid_input(format!(
                "Queue item {} cannot use the '{}' filter channel",
                item.id, item.channel
            )));
        }

        if self.contains(&item.id) {
            warn!("📞 Item {} already in queue {}, not re-queuing", item.id, self.queue_id);
            return Err(SupportError::already_exists(format!(
                "Queue item {} already in queue {}",
                item.id, self.queue_id
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("queue_id", &self.queue_id)
            .field("name", &self.name)
            .field("max_size", &self.max_size)
            .field("order", &self.order)
            .field("items", &self.items)
            .finish()
    }
}

/// Queue statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total: usize,
    pub waiting: usize,
    /// Items claimed by an agent (assigned or in progress)
    pub assigned: usize,
    /// Mean wait time in minutes over every item
    pub avg_wait_time: f64,
    /// Longest wait time in minutes
    pub longest_wait: u32,
    /// Waiting items past the breach threshold
    pub breach_risk: usize,
}

impl QueueStats {
    pub fn compute(items: &[QueueItem]) -> Self {
        let total = items.len();
        let waiting = items.iter().filter(|item| item.is_waiting()).count();

        let (avg_wait_time, longest_wait) = if total > 0 {
            let total_wait: u64 = items.iter().map(|item| u64::from(item.wait_time)).sum();
            let longest = items.iter().map(|item| item.wait_time).max().unwrap_or(0);
            (total_wait as f64 / total as f64, longest)
        } else {
            (0.0, 0)
        };

        let breach_risk = items
            .iter()
            .filter(|item| item.is_waiting() && item.sla_risk().is_breach_risk())
            .count();

        Self {
            total,
            waiting,
            assigned: total - waiting,
            avg_wait_time,
            longest_wait,
            breach_risk,
        }
    }
}
