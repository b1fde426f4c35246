//! Application Layer
//!
//! Port definitions and the handshake service.

pub mod ports;
pub mod services;
