// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::cast_possible_truncation,
        clippy::significant_drop_tightening
    )
)]

//! Robinhood Client - Rust Core Library
//!
//! Client for the Robinhood private web API: the multi-step login handshake
//! and paginated access to resource endpoints.
//!
//! # Architecture (Hexagonal)
//!
//! - **Domain**: identifiers, credentials, challenges, workflow state,
//!   handshake outcomes, order value objects
//! - **Application**: ports (`AuthGateway`, `WorkflowStore`, `Clock`,
//!   `DeviceIdSource`) and the `Authenticator` service
//! - **Infrastructure**: reqwest adapters, the in-memory workflow store,
//!   environment configuration, and the token cache
//!
//! # Login
//!
//! ```text
//! sign_in ─► start_handshake ─► Authenticated
//!                  │
//!                  └─► AwaitingInput(workflow_id) ─► resolve_challenge ─► finalize
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Handshake state and value objects.
pub mod domain;

/// Application layer - Ports and the login service.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

pub use application::ports::{AuthError, AuthGateway, Clock, SystemClock, WorkflowStore};
pub use application::services::Authenticator;
pub use domain::{
    AuthType, Challenge, ChallengeKind, Credential, DeviceId, HandshakeOutcome, PendingChallenge,
    SignInRequest, WorkflowId,
};
pub use infrastructure::config::{ClientSettings, ConfigError};
pub use infrastructure::persistence::InMemoryWorkflowStore;
pub use infrastructure::robinhood::{
    RobinhoodApi, RobinhoodAuthAdapter, RobinhoodConfig, RobinhoodError, fetch_all,
};
pub use infrastructure::token_cache::{CachedToken, FileTokenCache, token_is_expired};
