//! Handshake entry requests and outcomes.

use std::fmt;

use serde::Serialize;

use super::challenge::AuthType;
use super::credential::Credential;
use super::identifiers::{DeviceId, WorkflowId};

/// Input to the credential entry point.
pub enum SignInRequest {
    /// A bearer token obtained earlier; no handshake is run.
    Token {
        /// Bearer token.
        access_token: String,
        /// Refresh token, if the caller kept one.
        refresh_token: Option<String>,
        /// Device the token was issued to.
        device_id: Option<DeviceId>,
    },
    /// Username and password; runs the login handshake.
    Password {
        /// Account username (usually an email address).
        username: String,
        /// Account password.
        password: String,
        /// Device identifier to reuse; generated when absent.
        device_id: Option<DeviceId>,
    },
}

impl SignInRequest {
    /// Sign in with a stored bearer token.
    #[must_use]
    pub fn token(access_token: impl Into<String>) -> Self {
        Self::Token {
            access_token: access_token.into(),
            refresh_token: None,
            device_id: None,
        }
    }

    /// Sign in with a username and password.
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
            device_id: None,
        }
    }

    /// Use a specific device identifier.
    #[must_use]
    pub fn with_device_id(mut self, id: DeviceId) -> Self {
        match &mut self {
            Self::Token { device_id, .. } | Self::Password { device_id, .. } => {
                *device_id = Some(id);
            }
        }
        self
    }
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { device_id, .. } => f
                .debug_struct("Token")
                .field("access_token", &"[REDACTED]")
                .field("device_id", device_id)
                .finish_non_exhaustive(),
            Self::Password {
                username,
                device_id,
                ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .field("device_id", device_id)
                .finish(),
        }
    }
}

/// A paused handshake waiting for the user to act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChallenge {
    /// Handle to pass back to `resolve_challenge`.
    pub workflow_id: WorkflowId,
    /// Human-readable prompt.
    pub message: String,
    /// What the caller has to collect from the user.
    pub auth_type: AuthType,
}

/// Result of a handshake step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// A credential was issued.
    Authenticated(Credential),
    /// Out-of-band verification is required.
    AwaitingInput(PendingChallenge),
    /// The server refused the login.
    Failed {
        /// Server-supplied detail.
        message: String,
    },
}

impl HandshakeOutcome {
    /// Status label (`success`, `awaiting_input`, `error`).
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Authenticated(_) => "success",
            Self::AwaitingInput(_) => "awaiting_input",
            Self::Failed { .. } => "error",
        }
    }

    /// The issued credential, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Authenticated(credential) => Some(credential),
            _ => None,
        }
    }

    /// The pending challenge, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingChallenge> {
        match self {
            Self::AwaitingInput(pending) => Some(pending),
            _ => None,
        }
    }
}
