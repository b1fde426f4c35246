//! Robinhood client configuration.

use std::time::Duration;

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.robinhood.com/";

/// Production crypto API base URL.
pub const DEFAULT_CRYPTO_BASE_URL: &str = "https://nummus.robinhood.com/";

/// OAuth client id of the web application.
pub const DEFAULT_CLIENT_ID: &str = "c82SH0WZOsabOXGP2sxqcj34FxkvfnWRZBKlBjFS";

/// API version header value sent by the web application.
pub const DEFAULT_API_VERSION: &str = "1.431.4";

/// Session parameters sent with every token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Requested token lifetime in seconds.
    pub expires_in: u64,
    /// Ask for a long-lived session.
    pub long_session: bool,
    /// OAuth scope.
    pub scope: String,
    /// Preferred challenge mechanism on the initial login.
    pub challenge_type: String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            expires_in: 86_400,
            long_session: true,
            scope: "internal".to_string(),
            challenge_type: "sms".to_string(),
        }
    }
}

/// Configuration for the Robinhood HTTP adapters.
#[derive(Debug, Clone)]
pub struct RobinhoodConfig {
    /// Base URL for the brokerage API (trailing slash included).
    pub api_base_url: String,
    /// Base URL for the crypto API (trailing slash included).
    pub crypto_base_url: String,
    /// OAuth client id.
    pub client_id: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Token request parameters.
    pub session: SessionParams,
    /// Value of the `X-Robinhood-API-Version` header.
    pub api_version: String,
    /// Value of the `X-TimeZone-Id` header.
    pub timezone: String,
}

impl RobinhoodConfig {
    /// Configuration for the production endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            crypto_base_url: DEFAULT_CRYPTO_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout: Duration::from_secs(30),
            session: SessionParams::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timezone: "America/New_York".to_string(),
        }
    }

    /// Point the brokerage API at another host (tests, proxies).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = normalize_base(url.into());
        self
    }

    /// Point the crypto API at another host.
    #[must_use]
    pub fn with_crypto_base_url(mut self, url: impl Into<String>) -> Self {
        self.crypto_base_url = normalize_base(url.into());
        self
    }

    /// Set the OAuth client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the session parameters.
    #[must_use]
    pub fn with_session(mut self, session: SessionParams) -> Self {
        self.session = session;
        self
    }

    /// Absolute URL for a brokerage API path.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        join(&self.api_base_url, path)
    }

    /// Absolute URL for a crypto API path.
    #[must_use]
    pub fn crypto_url(&self, path: &str) -> String {
        join(&self.crypto_base_url, path)
    }
}

impl Default for RobinhoodConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

fn join(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{base}{}", path.trim_start_matches('/'))
}
