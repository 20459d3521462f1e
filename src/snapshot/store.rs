use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::{SnapshotEntry, SnapshotStore, generate_id};
use crate::core::{SnapshotError, SnapshotResult};

pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_millis(3_600_000);

struct LiveEntry {
    entry: SnapshotEntry,
    expires_at: Instant,
    /// Identifies which insert owns the key, so an eviction only removes
    /// the entry it was scheduled for.
    generation: u64,
    eviction: AbortHandle,
}

type EntryMap = HashMap<String, LiveEntry>;

/// Process-local snapshot store with one eviction timer per entry.
///
/// Must be used from inside a tokio runtime: every `put` spawns the task
/// that removes the entry once its TTL elapses.
pub struct InMemorySnapshotStore {
    entries: Arc<RwLock<EntryMap>>,
    ttl: Duration,
    next_generation: AtomicU64,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SNAPSHOT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert under a caller-chosen id, replacing any live entry with the
    /// same id and cancelling that entry's pending eviction.
    pub(crate) async fn insert(&self, id: String, payload: String) -> SnapshotEntry {
        let entry = SnapshotEntry {
            id: id.clone(),
            payload: Arc::from(payload),
            created_at: Utc::now(),
        };
        let expires_at = Instant::now() + self.ttl;
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write().await;
        let eviction = spawn_eviction(
            Arc::downgrade(&self.entries),
            id.clone(),
            generation,
            expires_at,
        );
        let previous = entries.insert(
            id.clone(),
            LiveEntry {
                entry: entry.clone(),
                expires_at,
                generation,
                eviction,
            },
        );
        drop(entries);

        if let Some(previous) = previous {
            previous.eviction.abort();
            warn!(id = %id, "snapshot id collision, previous entry overwritten");
        }
        entry
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_eviction(
    entries: Weak<RwLock<EntryMap>>,
    id: String,
    generation: u64,
    deadline: Instant,
) -> AbortHandle {
    let handle = tokio::spawn(async move {
        sleep_until(deadline).await;
        let Some(entries) = entries.upgrade() else {
            return;
        };
        let mut entries = entries.write().await;
        if entries
            .get(&id)
            .is_some_and(|live| live.generation == generation)
        {
            entries.remove(&id);
            debug!(id = %id, "snapshot expired");
        }
    });
    handle.abort_handle()
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn put(&self, payload: String) -> SnapshotResult<String> {
        if payload.is_empty() {
            return Err(SnapshotError::validation("no image data provided"));
        }

        let bytes = payload.len();
        let entry = self.insert(generate_id(), payload).await;
        debug!(id = %entry.id, bytes, "snapshot stored");
        Ok(entry.id)
    }

    async fn get(&self, id: &str) -> SnapshotResult<SnapshotEntry> {
        let entries = self.entries.read().await;
        match entries.get(id) {
            Some(live) if Instant::now() < live.expires_at => Ok(live.entry.clone()),
            _ => Err(SnapshotError::not_found("image not found")),
        }
    }

    async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|live| now < live.expires_at)
            .count()
    }
}

impl Drop for InMemorySnapshotStore {
    fn drop(&mut self) {
        if let Ok(mut entries) = self.entries.try_write() {
            for (_, live) in entries.drain() {
                live.eviction.abort();
            }
        }
    }
}
