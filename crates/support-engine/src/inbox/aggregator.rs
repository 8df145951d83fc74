use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::conversation::{Assignee, Conversation, ConversationStatus};
use super::filter::{paginate, sort_conversations, InboxFilter, InboxSort, Page};
use super::source::ConversationSource;
use crate::channel::Channel;
use crate::config::InboxConfig;
use crate::error::{Result, SupportError};
use crate::monitoring::{SupportEventHandler, TracingEventHandler};
use crate::types::{ConversationId, Priority};

/// Bookkeeping of the refreshes started on one inbox
#[derive(Debug, Default)]
struct RefreshState {
    /// Generation handed to the most recent `begin_refresh`
    issued: u64,
    /// Generation of the fetch whose result is currently shown
    applied: u64,
    in_flight: BTreeSet<u64>,
}

/// Handle for one in-flight refresh, returned by
/// [`UnifiedInbox::begin_refresh`].
///
/// Dropping the ticket without completing it (a timed out or aborted fetch)
/// withdraws the refresh, so `is_loading` cannot stay stuck.
#[derive(Debug)]
pub struct RefreshTicket {
    generation: u64,
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for RefreshTicket {
    fn drop(&mut self) {
        if self.state.lock().in_flight.remove(&self.generation) {
            debug!("🛑 Inbox refresh #{} abandoned", self.generation);
        }
    }
}

/// Operator-facing list of conversations from every channel
///
/// The inbox owns per-operator UI state (selection, stars, tags, loading).
/// Opening a conversation never changes its unread count; the host decides
/// when to call [`UnifiedInbox::mark_read`].
pub struct UnifiedInbox {
    conversations: Vec<Conversation>,
    selected: Option<ConversationId>,
    refresh: Arc<Mutex<RefreshState>>,
    sort: InboxSort,
    page_size: usize,
    events: Arc<dyn SupportEventHandler>,
}

impl UnifiedInbox {
    /// Create an inbox over an initial conversation set
    pub fn new(conversations: Vec<Conversation>) -> Result<Self> {
        Self::check_batch(&conversations)?;
        info!("📥 Unified inbox created with {} conversations", conversations.len());
        Ok(Self {
            conversations,
            selected: None,
            refresh: Arc::new(Mutex::new(RefreshState::default())),
            sort: InboxSort::Newest,
            page_size: InboxConfig::default().page_size,
            events: Arc::new(TracingEventHandler),
        })
    }

    /// Register the host hooks
    pub fn with_events(mut self, events: Arc<dyn SupportEventHandler>) -> Self {
        self.events = events;
        self
    }

    pub fn with_sort(mut self, sort: InboxSort) -> Self {
        self.sort = sort;
        self
    }

    /// Conversations per page; 0 is treated as 1
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// True while at least one refresh is in flight
    pub fn is_loading(&self) -> bool {
        !self.refresh.lock().in_flight.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> InboxSort {
        self.sort
    }

    pub fn set_sort(&mut self, sort: InboxSort) {
        self.sort = sort;
    }

    /// Conversations matching `query` in the current sort order.
    ///
    /// Matching is a case-insensitive substring test over subject, customer
    /// name, customer email and ticket id. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        self.events.on_search(query);
        self.collect(&InboxFilter::query(query))
    }

    /// Conversations matching every criterion of `filter`, sorted
    pub fn filter(&self, filter: &InboxFilter) -> Vec<&Conversation> {
        if !filter.query.trim().is_empty() {
            self.events.on_search(&filter.query);
        }
        self.collect(filter)
    }

    /// One page of the filtered, sorted list, `page_size` entries long
    pub fn page(&self, filter: &InboxFilter, page: usize) -> Page<&Conversation> {
        paginate(self.filter(filter), page, self.page_size)
    }

    /// Make a conversation the active selection
    pub fn select(&mut self, id: &ConversationId) -> Result<&Conversation> {
        let index = self.position(id)?;
        debug!("👉 Selected conversation {}", id);
        self.selected = Some(id.clone());
        self.events.on_conversation_select(id);
        Ok(&self.conversations[index])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&ConversationId> {
        self.selected.as_ref()
    }

    /// Zero the unread count; returns how many messages were unread
    pub fn mark_read(&mut self, id: &ConversationId) -> Result<u32> {
        let conversation = self.find_mut(id)?;
        let previous = std::mem::take(&mut conversation.unread_count);
        debug!("📖 Marked conversation {} read ({} unread)", id, previous);
        Ok(previous)
    }

    /// Flip the star flag; returns the new value
    pub fn toggle_star(&mut self, id: &ConversationId) -> Result<bool> {
        let conversation = self.find_mut(id)?;
        conversation.starred = !conversation.starred;
        Ok(conversation.starred)
    }

    /// Add a tag; returns false when it was already present
    pub fn add_tag(&mut self, id: &ConversationId, tag: &str) -> Result<bool> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(SupportError::invalid_input("Tag cannot be empty"));
        }
        let conversation = self.find_mut(id)?;
        Ok(conversation.tags.insert(tag.to_string()))
    }

    /// Remove a tag; returns false when it was not present
    pub fn remove_tag(&mut self, id: &ConversationId, tag: &str) -> Result<bool> {
        let conversation = self.find_mut(id)?;
        Ok(conversation.tags.remove(tag.trim()))
    }

    /// Hand a conversation to an agent, or unassign it with `None`
    pub fn assign(&mut self, id: &ConversationId, assignee: Option<Assignee>) -> Result<&Conversation> {
        let index = self.position(id)?;
        let conversation = &mut self.conversations[index];

        if conversation.status == ConversationStatus::Closed {
            return Err(SupportError::invalid_state(format!(
                "Conversation {} is closed",
                id
            )));
        }

        match &assignee {
            Some(a) => info!("👤 Conversation {} assigned to {}", id, a.name),
            None => info!("👤 Conversation {} unassigned", id),
        }
        conversation.assigned_to = assignee;
        Ok(&self.conversations[index])
    }

    /// Move a conversation through its resolution lifecycle
    pub fn set_status(&mut self, id: &ConversationId, status: ConversationStatus) -> Result<&Conversation> {
        let index = self.position(id)?;
        let conversation = &mut self.conversations[index];
        let current = conversation.status;

        if !current.can_transition_to(status) {
            return Err(SupportError::invalid_state(format!(
                "Conversation {} cannot move from {} to {}",
                id,
                current.as_str(),
                status.as_str()
            )));
        }

        info!("🔄 Conversation {} status: {} → {}", id, current.as_str(), status.as_str());
        conversation.status = status;
        Ok(&self.conversations[index])
    }

    /// Re-fetch the conversation set from `source`.
    ///
    /// On success the fetched set replaces the current one, a selection whose
    /// conversation vanished is cleared and `on_refresh` fires. On failure
    /// the current set is kept unchanged. `is_loading` is true only while the
    /// fetch is in flight, including when this future is dropped early.
    pub async fn refresh<S>(&mut self, source: &S) -> Result<usize>
    where
        S: ConversationSource + ?Sized,
    {
        let ticket = self.begin_refresh();
        let fetched = source.fetch_conversations().await;
        self.complete_refresh(ticket, fetched)
    }

    /// Mark a refresh as in flight
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        let mut state = self.refresh.lock();
        state.issued += 1;
        let generation = state.issued;
        state.in_flight.insert(generation);
        info!("🔄 Refreshing unified inbox (#{})", generation);

        RefreshTicket {
            generation,
            state: self.refresh.clone(),
        }
    }

    /// Apply the outcome of the fetch started with `ticket`.
    ///
    /// A result older than the one already shown is discarded: the current
    /// set stays, no hook fires and the current size is returned.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: Result<Vec<Conversation>>,
    ) -> Result<usize> {
        let generation = ticket.generation;
        let superseded = {
            let mut state = self.refresh.lock();
            state.in_flight.remove(&generation);
            generation < state.applied
        };
        drop(ticket);

        if superseded {
            debug!("⏭️ Discarding inbox refresh #{}, a newer one was applied", generation);
            return Ok(self.conversations.len());
        }

        let conversations = fetched.map_err(|e| {
            warn!("❌ Inbox refresh failed: {}", e);
            e
        })?;
        Self::check_batch(&conversations)?;

        self.refresh.lock().applied = generation;
        self.conversations = conversations;
        if let Some(id) = &self.selected {
            if self.get(id).is_none() {
                debug!("👉 Selected conversation {} no longer present", id);
                self.selected = None;
            }
        }

        info!("✅ Inbox refreshed with {} conversations", self.conversations.len());
        self.events.on_refresh();
        Ok(self.conversations.len())
    }

    /// Statistics over the current set
    pub fn stats(&self) -> InboxStats {
        InboxStats::compute(&self.conversations, None)
    }

    /// Statistics including SLA deadlines already passed at `now`
    pub fn stats_at(&self, now: DateTime<Utc>) -> InboxStats {
        InboxStats::compute(&self.conversations, Some(now))
    }

    /// Number of conversations per concrete channel
    pub fn channel_counts(&self) -> HashMap<Channel, usize> {
        let mut counts = HashMap::new();
        for conversation in &self.conversations {
            *counts.entry(conversation.channel).or_insert(0) += 1;
        }
        counts
    }

    /// Conversations on a channel; `Channel::All` returns every one
    pub fn by_channel(&self, channel: Channel) -> Vec<&Conversation> {
        self.collect(&InboxFilter::default().with_channel(channel))
    }

    /// Open or pending conversations whose SLA deadline has passed at `now`
    pub fn sla_overdue(&self, now: DateTime<Utc>) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|c| c.is_sla_overdue(now))
            .collect()
    }

    fn collect(&self, filter: &InboxFilter) -> Vec<&Conversation> {
        let mut matches: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| filter.matches(c))
            .collect();
        sort_conversations(&mut matches, self.sort);
        matches
    }

    fn position(&self, id: &ConversationId) -> Result<usize> {
        self.conversations
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| SupportError::not_found(format!("Conversation not found: {}", id)))
    }

    fn find_mut(&mut self, id: &ConversationId) -> Result<&mut Conversation> {
        let index = self.position(id)?;
        Ok(&mut self.conversations[index])
    }

    fn check_batch(conversations: &[Conversation]) -> Result<()> {
        let mut ids = HashSet::new();
        for conversation in conversations {
            conversation.validate()?;
            if !ids.insert(&conversation.id) {
                return Err(SupportError::already_exists(format!(
                    "Conversation {} appears twice",
                    conversation.id
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for UnifiedInbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedInbox")
            .field("conversations", &self.conversations.len())
            .field("selected", &self.selected)
            .field("loading", &self.is_loading())
            .field("sort", &self.sort)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Inbox statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxStats {
    pub total: usize,
    /// Conversations with at least one unread message
    pub unread_conversations: usize,
    /// Sum of unread messages
    pub unread_messages: u64,
    pub open: usize,
    pub pending: usize,
    pub resolved: usize,
    pub closed: usize,
    pub starred: usize,
    pub critical: usize,
    /// Conversations carrying an SLA deadline
    pub with_sla: usize,
    /// Active conversations past their deadline; 0 unless computed with a clock
    pub sla_overdue: usize,
}

impl InboxStats {
    pub fn compute(conversations: &[Conversation], now: Option<DateTime<Utc>>) -> Self {
        let mut stats = Self {
            total: conversations.len(),
            ..Self::default()
        };

        for c in conversations {
            if c.is_unread() {
                stats.unread_conversations += 1;
            }
            stats.unread_messages += u64::from(c.unread_count);
            match c.status {
                ConversationStatus::Open => stats.open += 1,
                ConversationStatus::Pending => stats.pending += 1,
                ConversationStatus::Resolved => stats.resolved += 1,
                ConversationStatus::Closed => stats.closed += 1,
            }
            if c.starred {
                stats.starred += 1;
            }
            if c.priority == Priority::Critical {
                stats.critical += 1;
            }
            if c.sla_deadline.is_some() {
                stats.with_sla += 1;
            }
            if now.map_or(false, |now| c.is_sla_overdue(now)) {
                stats.sla_overdue += 1;
            }
        }

        stats
    }
}
