//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the port interfaces defined in the
//! application layer, plus configuration and the token cache.

/// Robinhood HTTP adapters (auth gateway, resource endpoints, pagination).
pub mod robinhood;

/// Workflow state storage.
pub mod persistence;

/// Environment configuration.
pub mod config;

/// On-disk credential cache.
pub mod token_cache;
