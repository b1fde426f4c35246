//! Domain Layer
//!
//! Handshake state, credentials, and order value objects. No I/O lives here.

pub mod challenge;
pub mod credential;
pub mod handshake;
pub mod identifiers;
pub mod order;
pub mod workflow;

pub use challenge::{AuthType, Challenge, ChallengeKind};
pub use credential::Credential;
pub use handshake::{HandshakeOutcome, PendingChallenge, SignInRequest};
pub use identifiers::{ChallengeId, DeviceId, MachineId, VerificationWorkflowId, WorkflowId};
pub use order::{
    InstrumentRef, MarketHours, OrderRequest, OrderSide, OrderType, TimeInForce, Trigger,
};
pub use workflow::{LoginSecret, WorkflowState};
