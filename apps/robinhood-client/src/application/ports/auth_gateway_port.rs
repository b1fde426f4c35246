//! Auth Gateway Port (Driven Port)
//!
//! Interface to the login, pathfinder, challenge, and push endpoints used by
//! the handshake. The reqwest-backed adapter lives in
//! `infrastructure::robinhood`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Challenge, ChallengeId, Credential, DeviceId, LoginSecret, MachineId, VerificationWorkflowId,
    WorkflowId,
};

/// Which token request is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAttempt {
    /// First submission; carries the challenge-type hint.
    Initial,
    /// Second submission after a validated challenge.
    Finalize,
}

/// Decoded reply from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    /// A credential was issued.
    Token(Credential),
    /// Out-of-band verification is required.
    Verification(VerificationWorkflowId),
    /// Neither a token nor a workflow came back.
    Rejected {
        /// Server-supplied detail message.
        detail: String,
    },
}

/// Status of a challenge after a response or a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// The challenge was satisfied.
    Validated,
    /// Any other status, carrying the raw value.
    NotValidated(String),
}

impl ChallengeStatus {
    /// Map the wire value; only `validated` counts as success.
    #[must_use]
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("validated") => Self::Validated,
            Some(other) => Self::NotValidated(other.to_string()),
            None => Self::NotValidated(String::new()),
        }
    }

    /// Whether the challenge was satisfied.
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        matches!(self, Self::Validated)
    }
}

/// Handshake errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username, password, or refresh material is missing.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Machine registration or challenge lookup yielded no identifier.
    #[error("challenge discovery failed: {reason}")]
    ChallengeDiscoveryFailed {
        /// Which lookup came back empty.
        reason: String,
    },

    /// The server did not validate the challenge.
    #[error("{kind} challenge rejected (status: {status:?})")]
    ChallengeRejected {
        /// Challenge kind.
        kind: String,
        /// Status reported by the server.
        status: String,
    },

    /// No live handshake for this workflow identifier.
    #[error("unknown workflow: {workflow_id}")]
    UnknownWorkflow {
        /// The identifier that was looked up.
        workflow_id: WorkflowId,
    },

    /// The final token request did not yield an access token.
    #[error("token issuance failed: {detail}")]
    TokenIssuanceFailed {
        /// Server-supplied detail, if any.
        detail: String,
    },

    /// A non-success HTTP response.
    #[error("request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body or detail.
        message: String,
    },

    /// Network or decoding failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Endpoints the handshake talks to.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Submit a password grant to the token endpoint.
    async fn login(
        &self,
        secret: &LoginSecret,
        device_id: &DeviceId,
        attempt: LoginAttempt,
    ) -> Result<LoginReply, AuthError>;

    /// Register this device against a verification workflow.
    async fn register_machine(
        &self,
        device_id: &DeviceId,
        workflow: &VerificationWorkflowId,
    ) -> Result<Option<MachineId>, AuthError>;

    /// Look up the pending challenge for a machine registration.
    async fn fetch_challenge(&self, machine_id: &MachineId) -> Result<Option<Challenge>, AuthError>;

    /// Submit a code for an SMS challenge.
    async fn respond_to_challenge(
        &self,
        challenge_id: &ChallengeId,
        response: &str,
    ) -> Result<ChallengeStatus, AuthError>;

    /// Poll the approval status of a push challenge once.
    async fn prompt_status(&self, challenge_id: &ChallengeId) -> Result<ChallengeStatus, AuthError>;

    /// Tell the verification workflow to continue.
    async fn acknowledge(&self, machine_id: &MachineId) -> Result<(), AuthError>;

    /// Exchange a refresh token for a new credential.
    async fn refresh(
        &self,
        refresh_token: &str,
        device_id: &DeviceId,
    ) -> Result<LoginReply, AuthError>;
}
