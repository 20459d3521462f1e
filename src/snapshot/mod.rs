//! Ephemeral snapshot store
//!
//! Holds rendered life-in-weeks images behind short random identifiers so
//! they can be shared as links. Entries live for a fixed TTL from creation
//! and are never refreshed by reads.

mod page;
mod store;

pub use page::render_share_page;
pub use store::{DEFAULT_SNAPSHOT_TTL, InMemorySnapshotStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::SnapshotResult;

/// Length of generated identifiers, in hex characters. The prefix of a v4
/// UUID carries one fixed version nibble, leaving 60 random bits.
pub const SNAPSHOT_ID_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub id: String,
    pub payload: Arc<str>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store a payload and return its identifier.
    async fn put(&self, payload: String) -> SnapshotResult<String>;

    /// Fetch a live entry. Unknown and expired ids are both `NotFound`.
    async fn get(&self, id: &str) -> SnapshotResult<SnapshotEntry>;

    /// Number of live entries.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub(crate) fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SNAPSHOT_ID_LEN);
    id
}
