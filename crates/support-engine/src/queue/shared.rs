use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::item::QueueItem;
use super::manager::{QueueManager, QueueStats};
use crate::error::Result;
use crate::types::{AgentId, ItemId};

/// Queue shared between operators
///
/// Every operation takes the queue lock for its whole read-check-write, so
/// two operators racing to claim the same item cannot both succeed. Host
/// hooks run after the lock is released, so a hook may read the queue again.
#[derive(Debug, Clone)]
pub struct SharedQueue {
    inner: Arc<Mutex<QueueManager>>,
}

impl SharedQueue {
    pub fn new(queue: QueueManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    pub fn enqueue(&self, item: QueueItem) -> Result<usize> {
        self.inner.lock().enqueue(item)
    }

    /// Atomically claim a waiting item; returns the updated item
    pub fn assign(&self, item_id: &ItemId, agent_id: AgentId) -> Result<QueueItem> {
        let (item, events) = {
            let mut queue = self.inner.lock();
            let index = queue.claim(item_id, agent_id)?;
            (queue.items()[index].clone(), queue.events())
        };

        if let Some(agent) = item.assigned_to() {
            events.on_assign(&item.id, agent);
        }
        Ok(item)
    }

    pub fn start_work(&self, item_id: &ItemId) -> Result<QueueItem> {
        self.inner.lock().start_work(item_id).cloned()
    }

    pub fn resolve(&self, item_id: &ItemId) -> Result<QueueItem> {
        self.inner.lock().resolve(item_id)
    }

    pub fn click(&self, item_id: &ItemId) -> Result<QueueItem> {
        let (item, events) = {
            let queue = self.inner.lock();
            (queue.find(item_id)?.clone(), queue.events())
        };

        events.on_item_click(&item);
        Ok(item)
    }

    pub fn stats(&self) -> QueueStats {
        self.inner.lock().stats()
    }

    /// Copy of the items in arrival order
    pub fn snapshot(&self) -> Vec<QueueItem> {
        self.inner.lock().items().to_vec()
    }

    pub fn refresh_wait_times(&self, now: DateTime<Utc>) -> usize {
        self.inner.lock().refresh_wait_times(now)
    }

    /// Run a read-only closure against the locked queue
    pub fn with<R>(&self, f: impl FnOnce(&QueueManager) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Run a closure with exclusive access to the queue.
    ///
    /// Hooks fired by operations inside the closure run with the lock held
    /// and must not touch this queue.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut QueueManager) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

/// Periodically recompute wait times from arrival timestamps.
///
/// The first evaluation happens immediately. The task runs until aborted.
pub fn spawn_wait_time_ticker(queue: SharedQueue, period: Duration) -> JoinHandle<()> {
    info!("⏲️ Starting wait-time ticker (every {:?})", period);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let updated = queue.refresh_wait_times(Utc::now());
            debug!("⏲️ Wait-time tick updated {} items", updated);
        }
    })
}
