//! Support queue module
//!
//! This module provides the queue item model, the assignment state machine,
//! SLA risk classification and queue statistics.

pub mod item;
pub mod manager;
pub mod shared;
pub mod sla;

pub use item::{QueueItem, QueueItemRecord, QueueItemStatus, StatusKind};
pub use manager::{QueueManager, QueueStats};
pub use shared::{spawn_wait_time_ticker, SharedQueue};
pub use sla::{
    format_wait_time, SlaRisk, SLA_BREACH_THRESHOLD_MINUTES, SLA_ELEVATED_THRESHOLD_MINUTES,
};
