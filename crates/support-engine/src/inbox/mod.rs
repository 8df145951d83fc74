//! # Unified Inbox Module
//!
//! The unified inbox merges conversation threads from every channel into one
//! searchable, filterable list for an operator.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │     ConversationSource (ticketing, chat…)    │
//! └──────────────────────┬───────────────────────┘
//!                        │ refresh()
//! ┌──────────────────────▼───────────────────────┐
//! │                UnifiedInbox                  │
//! │  - search / filter / sort / paginate         │
//! │  - selection, stars, tags, assignment        │
//! │  - status lifecycle, statistics              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Conversations have their own resolution lifecycle
//! (`open`, `pending`, `resolved`, `closed`) that is independent of queue
//! admission. They are never deleted, only closed.
//!
//! ## Example
//!
//! ```rust
//! use omnidesk_support_engine::inbox::{Conversation, Customer, InboxFilter, UnifiedInbox};
//! use omnidesk_support_engine::{Channel, ConversationId, Priority};
//!
//! # fn example() -> omnidesk_support_engine::Result<()> {
//! let customer = Customer {
//!     name: "Ana Souza".to_string(),
//!     email: "ana@example.com".to_string(),
//!     avatar: None,
//! };
//! let mut inbox = UnifiedInbox::new(vec![
//!     Conversation::new("c-1", "TKT-001", "Refund request", customer, Channel::Email, Priority::High)
//!         .with_unread(2),
//! ])?;
//!
//! assert_eq!(inbox.search("REFUND").len(), 1);
//! assert_eq!(inbox.filter(&InboxFilter::default().with_channel(Channel::Chat)).len(), 0);
//!
//! inbox.select(&ConversationId::from("c-1"))?;
//! assert_eq!(inbox.stats().unread_messages, 2);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod conversation;
pub mod filter;
pub mod source;

pub use aggregator::{InboxStats, RefreshTicket, UnifiedInbox};
pub use conversation::{Assignee, Conversation, ConversationStatus, Customer};
pub use filter::{paginate, InboxFilter, InboxSort, Page};
pub use source::{ConversationSource, StaticSource};
