//! Robinhood-specific error types.

use thiserror::Error;

use crate::application::ports::AuthError;

/// Errors from the Robinhood HTTP adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RobinhoodError {
    /// Client construction failed.
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Detail message or raw body.
        body: String,
    },

    /// An order placement was refused.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// The order has no cancel link.
    #[error("Order cannot be cancelled: {reason}")]
    OrderNotCancelable {
        /// Why the order cannot be cancelled.
        reason: String,
    },

    /// A symbol lookup found nothing.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The symbol that was looked up.
        symbol: String,
        /// Symbols that are available, when known.
        available: Vec<String>,
    },

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl RobinhoodError {
    /// HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<RobinhoodError> for AuthError {
    fn from(err: RobinhoodError) -> Self {
        match err {
            RobinhoodError::RequestFailed { status, body } => Self::RequestFailed {
                status,
                message: body,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}
