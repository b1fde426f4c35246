//! In-memory workflow store with time-based eviction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::application::ports::{Clock, SystemClock, WorkflowStore};
use crate::domain::{Challenge, WorkflowId, WorkflowState};

/// How long an abandoned handshake is kept before eviction.
pub const DEFAULT_WORKFLOW_TTL: Duration = Duration::from_secs(10 * 60);

struct Entry {
    state: WorkflowState,
    created_at: DateTime<Utc>,
}

/// In-memory implementation of `WorkflowStore`.
///
/// Entries older than the TTL are invisible to lookups and are purged on
/// every write and lookup; `evict_expired` sweeps them explicitly. All
/// operations run under a single lock, so `take` is atomic with respect to
/// concurrent `take`/`challenge` calls on the same identifier.
pub struct InMemoryWorkflowStore {
    entries: Mutex<HashMap<WorkflowId, Entry>>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl InMemoryWorkflowStore {
    /// Create a store with the given clock and TTL.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Create a store on the system clock.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(Arc::new(SystemClock), ttl)
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let evicted = self.purge(&mut entries, now);
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted abandoned login workflows");
        }
        evicted
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.created_at) >= self.ttl
    }

    fn purge(&self, entries: &mut HashMap<WorkflowId, Entry>, now: DateTime<Utc>) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before - entries.len()
    }
}

impl Default for InMemoryWorkflowStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_WORKFLOW_TTL)
    }
}

impl fmt::Debug for InMemoryWorkflowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryWorkflowStore")
            .field("entries", &self.entries.lock().len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn insert(&self, state: WorkflowState) {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.purge(&mut entries, now);
        entries.insert(
            state.workflow_id.clone(),
            Entry {
                state,
                created_at: now,
            },
        );
    }

    fn challenge(&self, workflow_id: &WorkflowId) -> Option<Challenge> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.purge(&mut entries, now);
        entries
            .get(workflow_id)
            .map(|entry| entry.state.challenge.clone())
    }

    fn take(&self, workflow_id: &WorkflowId) -> Option<WorkflowState> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let entry = entries.remove(workflow_id)?;
        if self.is_expired(&entry, now) {
            return None;
        }
        Some(entry.state)
    }

    fn remove(&self, workflow_id: &WorkflowId) -> bool {
        self.entries.lock().remove(workflow_id).is_some()
    }

    fn len(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        self.purge(&mut entries, now);
        entries.len()
    }
}
