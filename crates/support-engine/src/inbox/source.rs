use async_trait::async_trait;

use super::conversation::Conversation;
use crate::error::Result;

/// External system the inbox re-fetches its conversations from
///
/// Implementations wrap the ticketing backend, chat gateway or whatever else
/// the host uses. Failures should be reported as `SupportError::Source`.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Fetch the complete current conversation set
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>>;
}

/// Source serving a fixed set of conversations
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    conversations: Vec<Conversation>,
}

impl StaticSource {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl ConversationSource for StaticSource {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>> {
        Ok(self.conversations.clone())
    }
}
