//! Shared fixtures: a messaging service over either storage backend

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use courier_core::application::MessagingService;
use courier_core::port::id_provider::SecureIdProvider;
use courier_core::port::time_provider::SystemTimeProvider;
use courier_core::port::{MessageStore, QueueStore, TimeProvider};
use courier_infra_memory::{InMemoryMessageStore, InMemoryQueueStore};
use courier_infra_metrics::PrometheusStats;
use courier_infra_sqlite::{create_pool, run_migrations, SqliteMessageStore, SqliteQueueStore};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Memory, Backend::Sqlite];
}

pub async fn open_stores(backend: Backend) -> (Arc<dyn QueueStore>, Arc<dyn MessageStore>) {
    match backend {
        Backend::Memory => (
            Arc::new(InMemoryQueueStore::new()) as Arc<dyn QueueStore>,
            Arc::new(InMemoryMessageStore::new()) as Arc<dyn MessageStore>,
        ),
        Backend::Sqlite => {
            let pool = create_pool("sqlite::memory:").await.unwrap();
            run_migrations(&pool).await.unwrap();
            (
                Arc::new(SqliteQueueStore::new(pool.clone())) as Arc<dyn QueueStore>,
                Arc::new(SqliteMessageStore::new(pool)) as Arc<dyn MessageStore>,
            )
        }
    }
}

pub struct Harness {
    pub service: Arc<MessagingService>,
    pub queues: Arc<dyn QueueStore>,
    pub messages: Arc<dyn MessageStore>,
    pub stats: Arc<PrometheusStats>,
}

pub async fn harness(backend: Backend) -> Harness {
    harness_with_clock(backend, Arc::new(SystemTimeProvider)).await
}

pub async fn harness_with_clock(backend: Backend, clock: Arc<dyn TimeProvider>) -> Harness {
    let (queues, messages) = open_stores(backend).await;
    let stats = Arc::new(PrometheusStats::new());
    let service = Arc::new(MessagingService::new(
        queues.clone(),
        messages.clone(),
        stats.clone(),
        Arc::new(SecureIdProvider),
        clock,
    ));

    Harness {
        service,
        queues,
        messages,
        stats,
    }
}

impl Harness {
    /// Counter value, 0 when it was never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.stats.value_of(name).unwrap_or(0.0) as u64
    }
}

/// Clock whose readings are set by the test, in milliseconds from a fixed epoch
#[derive(Default)]
pub struct ManualClock {
    offset_ms: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, offset_ms: i64) {
        self.offset_ms.store(offset_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        base + Duration::milliseconds(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Lowercase hex of the expected length after the prefix
pub fn is_namespaced_id(value: &str, prefix: &str) -> bool {
    value.strip_prefix(prefix).is_some_and(|hex| {
        hex.len() == 32
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    })
}
