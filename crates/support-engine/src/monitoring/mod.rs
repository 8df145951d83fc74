//! # Host Hooks and Event Monitoring
//!
//! The engine never renders anything itself. Instead it tells the host when
//! an operator action happened through the [`SupportEventHandler`] trait:
//!
//! ```text
//! QueueManager::assign ─────────► on_assign(item_id, agent_id)
//! QueueManager::click ──────────► on_item_click(item)
//! UnifiedInbox::select ─────────► on_conversation_select(id)
//! UnifiedInbox::search/filter ──► on_search(query)
//! UnifiedInbox::refresh ────────► on_refresh()
//! ```
//!
//! Hooks fire only after the corresponding operation succeeded, and always
//! synchronously on the caller's thread. Failed operations never fire a hook.
//!
//! Two handlers ship with the crate:
//!
//! - [`TracingEventHandler`]: logs every hook at `debug` level (the default)
//! - [`EventLog`]: records hooks in memory for dashboards and tests
//!
//! ```rust
//! use std::sync::Arc;
//! use omnidesk_support_engine::monitoring::{EventLog, SupportEvent};
//! use omnidesk_support_engine::queue::{QueueItem, QueueManager};
//! use omnidesk_support_engine::{Channel, Priority};
//!
//! # fn example() -> omnidesk_support_engine::Result<()> {
//! let log = Arc::new(EventLog::new());
//! let mut queue = QueueManager::new("support", "Support").with_events(log.clone());
//! queue.enqueue(QueueItem::new("1", "Acme Corp", Channel::Email, Priority::High))?;
//! queue.assign(&"1".into(), "agent-a".into())?;
//!
//! assert!(matches!(log.events().as_slice(), [SupportEvent::Assigned { .. }]));
//! # Ok(())
//! # }
//! ```

pub mod events;

pub use events::{EventLog, SupportEvent, SupportEventHandler, TracingEventHandler};
