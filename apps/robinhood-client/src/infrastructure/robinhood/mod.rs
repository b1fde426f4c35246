//! Robinhood Adapters
//!
//! reqwest-backed implementations for the Robinhood web API:
//! - `RobinhoodAuthAdapter`: the `AuthGateway` used by the login handshake
//! - `RobinhoodApi`: authenticated resource endpoints
//! - `fetch_all`: the paginated list fetcher both build on

mod api;
mod api_types;
mod auth_adapter;
mod config;
mod endpoints;
mod error;
mod http_client;
mod pagination;

pub use api::{EarningsQuery, MoverDirection, OptionType, OrderRef, OrdersQuery, RobinhoodApi};
pub use api_types::Page;
pub use auth_adapter::RobinhoodAuthAdapter;
pub use config::{
    DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_CLIENT_ID, DEFAULT_CRYPTO_BASE_URL,
    RobinhoodConfig, SessionParams,
};
pub use error::RobinhoodError;
pub use http_client::RobinhoodHttpClient;
pub use pagination::{PageSource, fetch_all};
