//! Support Queue Dashboard
//!
//! This demo:
//! 1. Loads an engine configuration (JSON file or defaults)
//! 2. Seeds the queue with items across channels and priorities
//! 3. Assigns the longest-waiting urgent item to an agent
//! 4. Loads a unified inbox from a static source and searches it
//! 5. Prints queue and inbox statistics

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Duration as ChronoDuration;
use clap::Parser;
use tracing::info;

use omnidesk_support_engine::inbox::StaticSource;
use omnidesk_support_engine::monitoring::TracingEventHandler;
use omnidesk_support_engine::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Omnichannel support queue dashboard", long_about = None)]
struct Args {
    /// Agent that picks up the next waiting item
    #[arg(short, long, default_value = "alice")]
    agent: String,

    /// Path to a JSON engine configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Inbox search query
    #[arg(short, long, default_value = "order")]
    query: String,

    /// Run the wait-time ticker for this many seconds before reporting
    #[arg(long, default_value = "0")]
    tick_for: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn customer(name: &str, email: &str) -> Customer {
    Customer {
        name: name.to_string(),
        email: email.to_string(),
        avatar: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "omnidesk_support_engine=debug,queue_dashboard=debug"
    } else {
        "omnidesk_support_engine=info,queue_dashboard=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path))?;
            SupportEngineConfig::from_json_str(&json)?
        }
        None => SupportEngineConfig::default(),
    };

    let engine = SupportEngine::with_events(config, Arc::new(TracingEventHandler))?;
    let now = Utc::now();

    let seed = vec![
        QueueItem::new("Q-1001", "Acme Corp", Channel::Email, Priority::Critical)
            .with_title("Payment failed")
            .with_created_at(now - ChronoDuration::minutes(42)),
        QueueItem::new("Q-1002", "Globex", Channel::Chat, Priority::Medium)
            .with_title("Where is my order?")
            .with_created_at(now - ChronoDuration::minutes(18)),
        QueueItem::new("Q-1003", "Initech", Channel::Phone, Priority::High)
            .with_title("Callback requested")
            .with_created_at(now - ChronoDuration::minutes(5)),
        QueueItem::new("Q-1004", "Umbrella", Channel::WhatsApp, Priority::Low)
            .with_title("Opening hours")
            .with_created_at(now - ChronoDuration::minutes(75)),
    ];
    engine.queue().with_mut(|q| q.enqueue_all(seed))?;
    engine.queue().refresh_wait_times(now);

    if args.tick_for > 0 {
        if let Some(ticker) = engine.start_wait_time_ticker() {
            tokio::time::sleep(Duration::from_secs(args.tick_for)).await;
            ticker.abort();
        }
    }

    for item in engine.queue().with(|q| q.prioritized().into_iter().cloned().collect::<Vec<_>>()) {
        let risk = item.sla_risk();
        info!(
            "📋 {} [{}] {} via {} waiting {} {}",
            item.id,
            item.priority,
            item.title,
            item.channel,
            item.formatted_wait_time(),
            risk.warning().unwrap_or("")
        );
    }

    let next = engine.queue().with(|q| q.next_waiting().map(|item| item.id.clone()));
    match next {
        Some(item_id) => {
            let item = engine.queue().assign(&item_id, AgentId::from(args.agent.as_str()))?;
            info!("👤 {} picked up {} ({})", args.agent, item.id, item.customer);
        }
        None => info!("📭 Nothing waiting"),
    }

    let source = StaticSource::new(vec![
        Conversation::new(
            "c-1",
            "TKT-2001",
            "Order arrived damaged",
            customer("Ana Souza", "ana@example.com"),
            Channel::Email,
            Priority::High,
        )
        .with_unread(3)
        .with_sla_deadline(now + ChronoDuration::hours(2)),
        Conversation::new(
            "c-2",
            "TKT-2002",
            "Change delivery address",
            customer("Ben Okafor", "ben@example.com"),
            Channel::Sms,
            Priority::Medium,
        )
        .with_tags(["delivery"]),
    ]);
    engine.refresh_inbox(&source).await?;

    {
        let inbox = engine.inbox().lock().await;
        for conversation in inbox.search(&args.query) {
            info!(
                "💬 {} {} from {} ({} unread) {}",
                conversation.ticket_id,
                conversation.subject,
                conversation.customer.name,
                conversation.unread_count,
                conversation.sla_annotation().unwrap_or_default()
            );
        }
    }

    for entry in engine.queue_channel_selector() {
        info!("📡 {:<10} {}", entry.label, entry.count.unwrap_or(0));
    }

    let stats = engine.statistics().await;
    info!(
        "📊 Queue: total={} waiting={} assigned={} avg_wait={:.1}m longest={}m breach_risk={}",
        stats.queue.total,
        stats.queue.waiting,
        stats.queue.assigned,
        stats.queue.avg_wait_time,
        stats.queue.longest_wait,
        stats.queue.breach_risk
    );
    info!(
        "📊 Inbox: total={} unread={} open={} critical={}",
        stats.inbox.total, stats.inbox.unread_conversations, stats.inbox.open, stats.inbox.critical
    );

    Ok(())
}
