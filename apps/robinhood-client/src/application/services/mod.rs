//! Application Services
//!
//! - `Authenticator`: credential entry point, login handshake, challenge
//!   resolution, finalization, and refresh.

mod authenticator;

pub use authenticator::Authenticator;
