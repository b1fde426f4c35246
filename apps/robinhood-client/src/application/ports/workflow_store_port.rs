//! Workflow Store Port
//!
//! Holds in-flight handshakes keyed by their caller-facing identifier.
//! Implementations must be safe for concurrent use by independent
//! handshakes.

use crate::domain::{Challenge, WorkflowId, WorkflowState};

/// Store of outstanding handshakes.
pub trait WorkflowStore: Send + Sync {
    /// Record a new outstanding handshake.
    fn insert(&self, state: WorkflowState);

    /// The challenge of a live handshake, without touching its secret.
    fn challenge(&self, workflow_id: &WorkflowId) -> Option<Challenge>;

    /// Atomically remove and return a live handshake.
    ///
    /// Of two concurrent calls for the same identifier, at most one
    /// receives the state.
    fn take(&self, workflow_id: &WorkflowId) -> Option<WorkflowState>;

    /// Discard a handshake. Returns whether it was present.
    fn remove(&self, workflow_id: &WorkflowId) -> bool;

    /// Number of live handshakes.
    fn len(&self) -> usize;

    /// Whether no handshake is outstanding.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
