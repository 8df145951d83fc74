use parking_lot::Mutex;
use tracing::debug;

use crate::queue::QueueItem;
use crate::types::{AgentId, ConversationId, ItemId};

/// Callbacks a host registers to learn about operator actions
///
/// Every method has an empty default so hosts implement only what they need.
pub trait SupportEventHandler: Send + Sync {
    /// A waiting queue item was assigned to an agent
    fn on_assign(&self, _item_id: &ItemId, _agent_id: &AgentId) {}

    /// The operator opened a queue item
    fn on_item_click(&self, _item: &QueueItem) {}

    /// The operator selected an inbox conversation
    fn on_conversation_select(&self, _conversation_id: &ConversationId) {}

    /// The operator ran an inbox search
    fn on_search(&self, _query: &str) {}

    /// An inbox refresh completed successfully
    fn on_refresh(&self) {}
}

/// Handler that logs every hook
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventHandler;

impl SupportEventHandler for TracingEventHandler {
    fn on_assign(&self, item_id: &ItemId, agent_id: &AgentId) {
        debug!("🪝 on_assign({}, {})", item_id, agent_id);
    }

    fn on_item_click(&self, item: &QueueItem) {
        debug!("🪝 on_item_click({})", item.id);
    }

    fn on_conversation_select(&self, conversation_id: &ConversationId) {
        debug!("🪝 on_conversation_select({})", conversation_id);
    }

    fn on_search(&self, query: &str) {
        debug!("🪝 on_search({:?})", query);
    }

    fn on_refresh(&self) {
        debug!("🪝 on_refresh()");
    }
}

/// Hook invocation captured by [`EventLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportEvent {
    Assigned { item_id: ItemId, agent_id: AgentId },
    ItemClicked(ItemId),
    ConversationSelected(ConversationId),
    Searched(String),
    Refreshed,
}

/// In-memory record of hook invocations, oldest first
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<SupportEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<SupportEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: SupportEvent) {
        self.events.lock().push(event);
    }
}

impl SupportEventHandler for EventLog {
    fn on_assign(&self, item_id: &ItemId, agent_id: &AgentId) {
        self.push(SupportEvent::Assigned {
            item_id: item_id.clone(),
            agent_id: agent_id.clone(),
        });
    }

    fn on_item_click(&self, item: &QueueItem) {
        self.push(SupportEvent::ItemClicked(item.id.clone()));
    }

    fn on_conversation_select(&self, conversation_id: &ConversationId) {
        self.push(SupportEvent::ConversationSelected(conversation_id.clone()));
    }

    fn on_search(&self, query: &str) {
        self.push(SupportEvent::Searched(query.to_string()));
    }

    fn on_refresh(&self) {
        self.push(SupportEvent::Refreshed);
    }
}
