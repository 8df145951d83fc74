//! # Omnichannel Support Engine
//!
//! This crate provides the support-queue core of the omnidesk stack: the
//! channel registry, the queue model with its assignment state machine and
//! SLA risk rules, and the unified inbox that merges conversations from every
//! channel into one operator list.
//!
//! ## Architecture
//!
//! - [`channel`]: supported channels and their display metadata
//! - [`queue`]: queue items, assignment, SLA risk and queue statistics
//! - [`inbox`]: conversation search, filtering, selection and refresh
//! - [`monitoring`]: host hooks fired on operator actions
//! - [`config`]: engine configuration
//!
//! The engine performs no I/O of its own. Records are handed in by the host,
//! and the only asynchronous boundary is [`inbox::ConversationSource`].
//!
//! ## Quick Start
//!
//! ```rust
//! use omnidesk_support_engine::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let engine = SupportEngine::new(SupportEngineConfig::default())?;
//!
//! engine.queue().enqueue(
//!     QueueItem::new("1", "Acme Corp", Channel::Email, Priority::Critical).with_wait_time(10),
//! )?;
//! engine.queue().enqueue(
//!     QueueItem::new("2", "Globex", Channel::Chat, Priority::Low).with_wait_time(40),
//! )?;
//!
//! engine.queue().assign(&ItemId::from("2"), AgentId::from("agent-a"))?;
//!
//! let stats = engine.queue().stats();
//! assert_eq!(stats.total, 2);
//! assert_eq!(stats.waiting, 1);
//! assert_eq!(stats.assigned, 1);
//! assert_eq!(stats.avg_wait_time, 25.0);
//! assert_eq!(stats.longest_wait, 40);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod types;

// Support functionality modules
pub mod channel;
pub mod queue;
pub mod inbox;
pub mod monitoring;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

// Re-exports for convenience
pub use channel::Channel;
pub use config::SupportEngineConfig;
pub use error::{Result, SupportError};
pub use types::{AgentId, ConversationId, IndicatorColor, ItemId, Priority};

use channel::{ChannelConfig, ChannelRegistry};
use inbox::{ConversationSource, InboxStats, UnifiedInbox};
use monitoring::{SupportEventHandler, TracingEventHandler};
use queue::{QueueManager, QueueStats, SharedQueue};

/// Main support engine
///
/// Bundles one shared queue and one unified inbox behind a validated
/// configuration, wired to the same host hooks.
pub struct SupportEngine {
    config: SupportEngineConfig,
    registry: ChannelRegistry,
    queue: SharedQueue,
    inbox: Arc<Mutex<UnifiedInbox>>,
}

impl SupportEngine {
    /// Create an engine that logs hook invocations
    pub fn new(config: SupportEngineConfig) -> Result<Self> {
        Self::with_events(config, Arc::new(TracingEventHandler))
    }

    /// Create an engine reporting operator actions to `events`
    pub fn with_events(config: SupportEngineConfig, events: Arc<dyn SupportEventHandler>) -> Result<Self> {
        config.validate()?;
        info!(
            "🎯 Initializing SupportEngine for queue {} ({})",
            config.queue.queue_id, config.queue.name
        );

        let registry = ChannelRegistry::with_overrides(config.channels.channels.clone())?;
        let queue = QueueManager::from_config(&config.queue).with_events(events.clone());
        let inbox = UnifiedInbox::new(Vec::new())?
            .with_sort(config.inbox.default_sort)
            .with_page_size(config.inbox.page_size)
            .with_events(events);

        Ok(Self {
            config,
            registry,
            queue: SharedQueue::new(queue),
            inbox: Arc::new(Mutex::new(inbox)),
        })
    }

    pub fn config(&self) -> &SupportEngineConfig {
        &self.config
    }

    pub fn queue(&self) -> &SharedQueue {
        &self.queue
    }

    pub fn inbox(&self) -> &Arc<Mutex<UnifiedInbox>> {
        &self.inbox
    }

    /// Channel selector entries for the queue view, with live counts when
    /// the configuration asks for them
    pub fn queue_channel_selector(&self) -> Vec<ChannelConfig> {
        if self.config.channels.show_counts {
            let counts = self.queue.with(|q| q.channel_counts());
            self.registry.with_counts(&counts)
        } else {
            self.registry.channels().to_vec()
        }
    }

    /// Channel selector entries for the inbox view
    pub async fn inbox_channel_selector(&self) -> Vec<ChannelConfig> {
        if self.config.channels.show_counts {
            let counts = self.inbox.lock().await.channel_counts();
            self.registry.with_counts(&counts)
        } else {
            self.registry.channels().to_vec()
        }
    }

    /// Re-fetch the inbox without holding the inbox lock during the fetch,
    /// so other callers can observe `is_loading` meanwhile.
    ///
    /// Refreshes may overlap; the newest fetch wins. Dropping this future
    /// (for example under `tokio::time::timeout`) withdraws the refresh.
    pub async fn refresh_inbox<S>(&self, source: &S) -> Result<usize>
    where
        S: ConversationSource + ?Sized,
    {
        let ticket = self.inbox.lock().await.begin_refresh();
        let fetched = source.fetch_conversations().await;
        self.inbox.lock().await.complete_refresh(ticket, fetched)
    }

    /// Start the periodic wait-time re-evaluation, unless disabled
    pub fn start_wait_time_ticker(&self) -> Option<JoinHandle<()>> {
        self.config
            .monitoring
            .tick_interval()
            .map(|period| queue::spawn_wait_time_ticker(self.queue.clone(), period))
    }

    /// Queue and inbox statistics
    pub async fn statistics(&self) -> SupportEngineStats {
        SupportEngineStats {
            queue: self.queue.stats(),
            inbox: self.inbox.lock().await.stats(),
        }
    }
}

/// Combined engine statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SupportEngineStats {
    pub queue: QueueStats,
    pub inbox: InboxStats,
}

/// Prelude module for convenient imports
pub mod prelude {
    // Core types
    pub use crate::{
        AgentId, Channel, ConversationId, ItemId, Priority, Result, SupportEngine,
        SupportEngineConfig, SupportEngineStats, SupportError,
    };

    // Configuration types
    pub use crate::config::{
        ChannelSelectorConfig, InboxConfig, MonitoringConfig, QueueConfig, QueueOrder,
        SelectorSize, SelectorVariant,
    };

    // Channel types
    pub use crate::channel::{is_selected, list_channels, ChannelConfig, ChannelRegistry, ChannelStyle};

    // Queue types
    pub use crate::queue::{
        format_wait_time, QueueItem, QueueItemStatus, QueueManager, QueueStats, SharedQueue, SlaRisk,
    };

    // Inbox types
    pub use crate::inbox::{
        Assignee, Conversation, ConversationSource, ConversationStatus, Customer, InboxFilter,
        InboxSort, InboxStats, Page, UnifiedInbox,
    };

    // Monitoring types
    pub use crate::monitoring::{EventLog, SupportEvent, SupportEventHandler};

    // Common external types
    pub use chrono::{DateTime, Utc};
}
