//! In-flight handshake state.
//!
//! A `WorkflowState` exists only between the moment the login endpoint asks
//! for out-of-band verification and the moment the handshake finalizes. It
//! is never cloned, never persisted, and is consumed by value when the
//! handshake is finalized so the login secret cannot outlive that call.

use std::fmt;

use super::challenge::Challenge;
use super::identifiers::{DeviceId, MachineId, VerificationWorkflowId, WorkflowId};

/// Username and password held only for the duration of a handshake.
///
/// Not `Clone`. Cleared on drop.
pub struct LoginSecret {
    username: String,
    password: String,
}

impl LoginSecret {
    /// Wrap a username/password pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether either half is blank.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.username.trim().is_empty() || self.password.is_empty()
    }
}

impl Drop for LoginSecret {
    fn drop(&mut self) {
        self.password.clear();
        self.username.clear();
    }
}

impl fmt::Debug for LoginSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSecret")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// One outstanding handshake waiting for challenge resolution.
#[derive(Debug)]
pub struct WorkflowState {
    /// Caller-facing handle.
    pub workflow_id: WorkflowId,
    /// Verification workflow reported by the login endpoint.
    pub verification_workflow_id: VerificationWorkflowId,
    /// Machine registration obtained during discovery.
    pub machine_id: MachineId,
    /// Device identifier used for the initial login; reused on finalization.
    pub device_id: DeviceId,
    /// The challenge the user must satisfy.
    pub challenge: Challenge,
    /// Original credentials, resent once by the finalizer.
    pub secret: LoginSecret,
}
