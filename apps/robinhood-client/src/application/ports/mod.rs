//! Application Ports (Driven)
//!
//! Ports define the interfaces the handshake uses to reach the outside
//! world: the auth endpoints, the workflow store, time, and randomness.

mod auth_gateway_port;
mod clock_port;
mod device_id_port;
mod workflow_store_port;

pub use auth_gateway_port::{AuthError, AuthGateway, ChallengeStatus, LoginAttempt, LoginReply};
pub use clock_port::{Clock, ManualClock, SystemClock};
pub use device_id_port::{DeviceIdSource, RandomDeviceIds};
pub use workflow_store_port::WorkflowStore;
