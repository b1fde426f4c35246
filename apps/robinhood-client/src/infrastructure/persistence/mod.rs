//! Persistence Adapters
//!
//! Process-local storage for in-flight handshakes.

mod workflow_store;

pub use workflow_store::{DEFAULT_WORKFLOW_TTL, InMemoryWorkflowStore};
