//! Strongly-typed identifiers used by the login handshake.
//!
//! These prevent mixing up the caller-facing workflow handle with the
//! server-side identifiers discovered along the way.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    WorkflowId,
    "Caller-facing handle correlating a paused handshake with its resolution."
);
define_id!(
    DeviceId,
    "Stable identifier for the calling device (sent as `device_token`)."
);
define_id!(
    VerificationWorkflowId,
    "Server-side verification workflow returned by the login endpoint."
);
define_id!(
    MachineId,
    "Server-side machine registration identifier for a verification workflow."
);
define_id!(ChallengeId, "Server-side identifier of a pending challenge.");

impl WorkflowId {
    /// Generate a fresh, unguessable workflow handle.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
