//! Integration tests for the support engine
//!
//! These tests drive the queue and the unified inbox through the public
//! engine facade, the way a host UI or service would.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use omnidesk_support_engine::prelude::*;
use omnidesk_support_engine::queue::spawn_wait_time_ticker;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create_test_engine() -> Result<(SupportEngine, Arc<EventLog>)> {
    init_tracing();
    let log = Arc::new(EventLog::new());
    let engine = SupportEngine::with_events(SupportEngineConfig::default(), log.clone())?;
    Ok((engine, log))
}

fn customer(name: &str) -> Customer {
    Customer {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        avatar: None,
    }
}

fn conversation(id: &str, subject: &str, channel: Channel) -> Conversation {
    Conversation::new(id, format!("TKT-{}", id), subject, customer("Mira"), channel, Priority::Medium)
}

struct FailingSource;

#[async_trait]
impl ConversationSource for FailingSource {
    async fn fetch_conversations(&self) -> omnidesk_support_engine::Result<Vec<Conversation>> {
        Err(SupportError::source_failed("chat gateway unreachable"))
    }
}

/// Source that answers after a fixed delay
struct DelayedSource {
    delay: StdDuration,
    conversations: Vec<Conversation>,
}

#[async_trait]
impl ConversationSource for DelayedSource {
    async fn fetch_conversations(&self) -> omnidesk_support_engine::Result<Vec<Conversation>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.conversations.clone())
    }
}

/// Source that records whether the inbox reported loading while fetching
struct ObservingSource {
    inbox: Arc<tokio::sync::Mutex<UnifiedInbox>>,
    seen_loading: std::sync::atomic::AtomicBool,
    conversations: Vec<Conversation>,
}

#[async_trait]
impl ConversationSource for ObservingSource {
    async fn fetch_conversations(&self) -> omnidesk_support_engine::Result<Vec<Conversation>> {
        let loading = self.inbox.lock().await.is_loading();
        self.seen_loading
            .store(loading, std::sync::atomic::Ordering::SeqCst);
        Ok(self.conversations.clone())
    }
}

#[tokio::test]
async fn test_end_to_end_assignment_scenario() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let queue = engine.queue();

    queue.enqueue(QueueItem::new("1", "Acme", Channel::Email, Priority::Critical).with_wait_time(10))?;
    queue.enqueue(QueueItem::new("2", "Globex", Channel::Chat, Priority::Low).with_wait_time(40))?;

    let stats = queue.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.waiting, 2);
    assert_eq!(stats.assigned, 0);
    assert_eq!(stats.avg_wait_time, 25.0);
    assert_eq!(stats.longest_wait, 40);

    let item = queue.assign(&ItemId::from("2"), AgentId::from("agentA"))?;
    assert_eq!(item.status.kind(), omnidesk_support_engine::queue::StatusKind::Assigned);
    assert_eq!(item.assigned_to(), Some(&AgentId::from("agentA")));

    let stats = queue.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.assigned, 1);
    assert_eq!(stats.avg_wait_time, 25.0);
    assert_eq!(stats.longest_wait, 40);
    assert_eq!(stats.total, stats.waiting + stats.assigned);

    assert_eq!(
        log.events(),
        vec![SupportEvent::Assigned {
            item_id: ItemId::from("2"),
            agent_id: AgentId::from("agentA"),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_operations_leave_queue_unchanged() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let queue = engine.queue();
    queue.enqueue(QueueItem::new("1", "Acme", Channel::Phone, Priority::High))?;
    queue.assign(&ItemId::from("1"), AgentId::from("agentA"))?;
    let before = queue.snapshot();

    let again = queue.assign(&ItemId::from("1"), AgentId::from("agentB"));
    assert!(matches!(again, Err(SupportError::InvalidState(_))));

    let missing = queue.assign(&ItemId::from("nope"), AgentId::from("agentB"));
    assert!(matches!(missing, Err(SupportError::NotFound(_))));

    assert_eq!(queue.snapshot(), before);
    assert_eq!(log.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_full_item_lifecycle() -> Result<()> {
    let (engine, _log) = create_test_engine()?;
    let queue = engine.queue();
    let id = ItemId::from("42");

    queue.enqueue(QueueItem::new("42", "Initech", Channel::Video, Priority::Medium).with_title("Setup call"))?;
    queue.assign(&id, AgentId::from("agentC"))?;
    let working = queue.start_work(&id)?;
    assert_eq!(working.status.kind(), omnidesk_support_engine::queue::StatusKind::InProgress);

    let resolved = queue.resolve(&id)?;
    assert_eq!(resolved.title, "Setup call");
    assert!(queue.snapshot().is_empty());
    assert_eq!(queue.stats().avg_wait_time, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_queue_channel_selector_counts() -> Result<()> {
    let (engine, _log) = create_test_engine()?;
    engine.queue().enqueue(QueueItem::new("1", "A", Channel::Email, Priority::Low))?;
    engine.queue().enqueue(QueueItem::new("2", "B", Channel::Email, Priority::Low))?;
    engine.queue().enqueue(QueueItem::new("3", "C", Channel::Sms, Priority::Low))?;

    let selector = engine.queue_channel_selector();
    assert_eq!(selector.len(), 10);
    assert_eq!(selector[0].channel, Channel::All);
    assert_eq!(selector[0].count, Some(3));
    let email = selector.iter().find(|c| c.channel == Channel::Email);
    assert_eq!(email.and_then(|c| c.count), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_refresh_replaces_conversations_and_fires_hook() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let source = StaticSourceFixture::two_conversations();

    let count = engine.refresh_inbox(&source.0).await?;
    assert_eq!(count, 2);

    let mut inbox = engine.inbox().lock().await;
    assert!(!inbox.is_loading());
    inbox.select(&ConversationId::from("c-2"))?;
    assert_eq!(inbox.search("invoice").len(), 1);
    drop(inbox);

    assert_eq!(
        log.events(),
        vec![
            SupportEvent::Refreshed,
            SupportEvent::ConversationSelected(ConversationId::from("c-2")),
            SupportEvent::Searched("invoice".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_keeps_existing_set() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let source = StaticSourceFixture::two_conversations();
    engine.refresh_inbox(&source.0).await?;
    engine.inbox().lock().await.select(&ConversationId::from("c-1"))?;
    log.clear();

    let err = engine.refresh_inbox(&FailingSource).await.unwrap_err();
    assert!(matches!(err, SupportError::Source(_)));

    let inbox = engine.inbox().lock().await;
    assert!(!inbox.is_loading());
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox.selected_id(), Some(&ConversationId::from("c-1")));
    assert!(log.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_refresh_exposes_loading_and_drops_stale_selection() -> Result<()> {
    let (engine, _log) = create_test_engine()?;
    let source = StaticSourceFixture::two_conversations();
    engine.refresh_inbox(&source.0).await?;
    engine.inbox().lock().await.select(&ConversationId::from("c-1"))?;

    let observing = ObservingSource {
        inbox: engine.inbox().clone(),
        seen_loading: std::sync::atomic::AtomicBool::new(false),
        conversations: vec![conversation("c-3", "New lead", Channel::Facebook)],
    };
    engine.refresh_inbox(&observing).await?;

    assert!(observing.seen_loading.load(std::sync::atomic::Ordering::SeqCst));
    let inbox = engine.inbox().lock().await;
    assert!(!inbox.is_loading());
    assert!(inbox.selected().is_none());
    assert_eq!(inbox.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_refresh_does_not_leave_inbox_loading() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let source = StaticSourceFixture::two_conversations();
    engine.refresh_inbox(&source.0).await?;
    log.clear();

    let slow = DelayedSource {
        delay: StdDuration::from_secs(5),
        conversations: vec![conversation("c-9", "Never arrives", Channel::Chat)],
    };
    let outcome = tokio::time::timeout(StdDuration::from_millis(50), engine.refresh_inbox(&slow)).await;
    assert!(outcome.is_err());

    let inbox = engine.inbox().lock().await;
    assert!(!inbox.is_loading());
    assert_eq!(inbox.len(), 2);
    assert!(log.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_overlapping_refreshes_newest_wins() -> Result<()> {
    let (engine, log) = create_test_engine()?;
    let engine = Arc::new(engine);

    let slow_engine = engine.clone();
    let slow = tokio::spawn(async move {
        let source = DelayedSource {
            delay: StdDuration::from_millis(300),
            conversations: vec![conversation("stale", "Old snapshot", Channel::Email)],
        };
        slow_engine.refresh_inbox(&source).await
    });
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    assert!(engine.inbox().lock().await.is_loading());

    let fast = DelayedSource {
        delay: StdDuration::from_millis(10),
        conversations: vec![
            conversation("fresh-1", "New snapshot", Channel::Sms),
            conversation("fresh-2", "New snapshot", Channel::Sms),
        ],
    };
    assert_eq!(engine.refresh_inbox(&fast).await?, 2);
    assert!(engine.inbox().lock().await.is_loading());

    assert_eq!(slow.await??, 2);
    let inbox = engine.inbox().lock().await;
    assert!(!inbox.is_loading());
    assert!(inbox.get(&ConversationId::from("fresh-1")).is_some());
    assert!(inbox.get(&ConversationId::from("stale")).is_none());
    assert_eq!(log.events(), vec![SupportEvent::Refreshed]);
    Ok(())
}

#[tokio::test]
async fn test_hook_reading_queue_does_not_block_assign() -> Result<()> {
    init_tracing();

    #[derive(Default)]
    struct CountingHook {
        queue: parking_lot::Mutex<Option<SharedQueue>>,
        assigned_seen: parking_lot::Mutex<Vec<usize>>,
    }

    impl SupportEventHandler for CountingHook {
        fn on_assign(&self, _item_id: &ItemId, _agent_id: &AgentId) {
            let queue = self.queue.lock().clone();
            if let Some(queue) = queue {
                let assigned = queue.stats().assigned;
                self.assigned_seen.lock().push(assigned);
            }
        }
    }

    let hook = Arc::new(CountingHook::default());
    let engine = SupportEngine::with_events(SupportEngineConfig::default(), hook.clone())?;
    *hook.queue.lock() = Some(engine.queue().clone());
    engine.queue().enqueue(QueueItem::new("1", "Acme", Channel::Email, Priority::High))?;

    let queue = engine.queue().clone();
    let assign = tokio::task::spawn_blocking(move || queue.assign(&ItemId::from("1"), AgentId::from("a")));
    tokio::time::timeout(StdDuration::from_secs(5), assign).await???;

    assert_eq!(*hook.assigned_seen.lock(), vec![1]);
    Ok(())
}

#[tokio::test]
async fn test_inbox_statistics_and_sla() -> Result<()> {
    let (engine, _log) = create_test_engine()?;
    let now = Utc::now();
    let source = omnidesk_support_engine::inbox::StaticSource::new(vec![
        conversation("late", "Broken hinge", Channel::Phone)
            .with_sla_deadline(now - Duration::hours(1))
            .with_unread(2),
        conversation("fine", "Catalog request", Channel::Email).with_sla_deadline(now + Duration::hours(4)),
        conversation("none", "Thanks!", Channel::Twitter),
    ]);
    engine.refresh_inbox(&source).await?;

    let inbox = engine.inbox().lock().await;
    let stats = inbox.stats_at(now);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.with_sla, 2);
    assert_eq!(stats.sla_overdue, 1);
    assert_eq!(stats.unread_messages, 2);
    assert_eq!(inbox.stats().sla_overdue, 0);

    let overdue: Vec<&str> = inbox.sla_overdue(now).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(overdue, vec!["late"]);
    assert!(inbox.get(&ConversationId::from("fine")).and_then(|c| c.sla_annotation()).is_some());
    assert!(inbox.get(&ConversationId::from("none")).and_then(|c| c.sla_annotation()).is_none());
    drop(inbox);

    let selector = engine.inbox_channel_selector().await;
    let phone = selector.iter().find(|c| c.channel == Channel::Phone);
    assert_eq!(phone.and_then(|c| c.count), Some(1));

    let combined = engine.statistics().await;
    assert_eq!(combined.inbox.total, 3);
    assert_eq!(combined.queue.total, 0);
    Ok(())
}

#[tokio::test]
async fn test_wait_time_ticker_updates_waiting_items() -> Result<()> {
    init_tracing();
    let queue = SharedQueue::new(QueueManager::new("support", "Support"));
    queue.enqueue(
        QueueItem::new("1", "Acme", Channel::WebChat, Priority::High)
            .with_created_at(Utc::now() - Duration::minutes(45)),
    )?;
    assert_eq!(queue.stats().breach_risk, 0);

    let handle = spawn_wait_time_ticker(queue.clone(), StdDuration::from_millis(10));
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    handle.abort();

    let snapshot = queue.snapshot();
    assert!(snapshot[0].wait_time >= 45);
    assert_eq!(snapshot[0].sla_risk(), SlaRisk::Breach);
    assert_eq!(queue.stats().breach_risk, 1);
    Ok(())
}

#[tokio::test]
async fn test_engine_from_json_config() -> Result<()> {
    init_tracing();
    let config = SupportEngineConfig::from_json_str(
        r#"{
            "queue": { "queue_id": "vip", "name": "VIP Desk", "max_size": 2, "order": "priority" },
            "channels": {
                "channels": [
                    { "channel": "all", "label": "Everything", "icon": "inbox",
                      "style": { "text": "text-gray-700", "background": "bg-gray-100" } },
                    { "channel": "phone", "label": "Phone", "icon": "phone",
                      "style": { "text": "text-purple-600", "background": "bg-purple-100" } }
                ],
                "showCounts": false
            },
            "inbox": { "page_size": 2, "default_sort": "priority" },
            "monitoring": { "wait_time_tick_secs": 0 }
        }"#,
    )?;
    let engine = SupportEngine::new(config)?;

    assert!(engine.start_wait_time_ticker().is_none());
    let selector = engine.queue_channel_selector();
    assert_eq!(selector.len(), 2);
    assert_eq!(selector[0].label, "Everything");
    assert!(selector.iter().all(|c| c.count.is_none()));

    engine.queue().enqueue(QueueItem::new("a", "A", Channel::Phone, Priority::Low))?;
    engine.queue().enqueue(QueueItem::new("b", "B", Channel::Phone, Priority::Critical))?;
    let full = engine.queue().enqueue(QueueItem::new("c", "C", Channel::Phone, Priority::Low));
    assert!(matches!(full, Err(SupportError::InvalidState(_))));

    let first = engine.queue().with(|q| q.display_order()[0].id.clone());
    assert_eq!(first, ItemId::from("b"));

    let source = omnidesk_support_engine::inbox::StaticSource::new(vec![
        conversation("p-1", "One", Channel::Phone),
        conversation("p-2", "Two", Channel::Phone),
        conversation("p-3", "Three", Channel::Phone),
    ]);
    engine.refresh_inbox(&source).await?;
    let inbox = engine.inbox().lock().await;
    assert_eq!(inbox.page_size(), 2);
    assert_eq!(inbox.sort(), InboxSort::Priority);
    let page = inbox.page(&InboxFilter::default(), 2);
    assert_eq!(page.per_page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    Ok(())
}

struct StaticSourceFixture(omnidesk_support_engine::inbox::StaticSource);

impl StaticSourceFixture {
    fn two_conversations() -> Self {
        Self(omnidesk_support_engine::inbox::StaticSource::new(vec![
            conversation("c-1", "Delivery delayed", Channel::WhatsApp),
            conversation("c-2", "Invoice copy needed", Channel::Email),
        ]))
    }
}
