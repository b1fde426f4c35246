//! Out-of-band verification challenges.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identifiers::ChallengeId;

/// Verification mechanism chosen by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    /// A code delivered by SMS that the user types back.
    Sms,
    /// A push notification the user approves on a trusted device.
    Push,
    /// Any other mechanism, carrying the raw server value.
    Other(String),
}

impl ChallengeKind {
    /// Parse the `type` field of a challenge descriptor.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "sms" => Self::Sms,
            "push" | "prompt" => Self::Push,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Wire value of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sms => "sms",
            Self::Push => "push",
            Self::Other(raw) => raw,
        }
    }

    /// Whether resolving this challenge needs text typed by the user.
    #[must_use]
    pub const fn requires_input(&self) -> bool {
        matches!(self, Self::Sms)
    }

    /// Caller-facing classification of this challenge.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::Sms => AuthType::Mfa,
            Self::Push => AuthType::DeviceConfirmation,
            Self::Other(_) => AuthType::Unknown,
        }
    }

    /// Prompt to show the user while the handshake is paused.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            Self::Sms => "Enter the SMS code:",
            Self::Push => "Confirm device approval and press Enter:",
            Self::Other(_) => "Complete the verification challenge and press Enter:",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending challenge discovered for a verification workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Server-side challenge identifier.
    pub id: ChallengeId,
    /// Verification mechanism.
    pub kind: ChallengeKind,
}

impl Challenge {
    /// Create a challenge.
    #[must_use]
    pub const fn new(id: ChallengeId, kind: ChallengeKind) -> Self {
        Self { id, kind }
    }
}

/// What the caller has to do to resolve a paused handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Type back a one-time code (SMS or authenticator).
    Mfa,
    /// Approve the login on a trusted device, then resolve with no input.
    DeviceConfirmation,
    /// Unrecognized mechanism.
    Unknown,
}

impl AuthType {
    /// Wire value (`mfa`, `device_confirmation`, `unknown`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mfa => "mfa",
            Self::DeviceConfirmation => "device_confirmation",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
