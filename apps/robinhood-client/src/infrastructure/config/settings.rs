//! Client Configuration Settings
//!
//! Settings for the client binary, loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::DeviceId;
use crate::infrastructure::persistence::DEFAULT_WORKFLOW_TTL;
use crate::infrastructure::robinhood::{
    DEFAULT_API_BASE_URL, DEFAULT_CRYPTO_BASE_URL, RobinhoodConfig,
};

/// Default location of the token cache.
pub const DEFAULT_TOKEN_FILE: &str = "robinhood_auth.json";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password for the password grant.
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Get the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Complete client configuration.
#[derive(Clone)]
pub struct ClientSettings {
    /// Password-grant credentials, if configured.
    pub login: Option<LoginCredentials>,
    /// Pre-issued access token, if configured.
    pub token: Option<String>,
    /// Device token to reuse across sessions.
    pub device_token: Option<String>,
    /// Brokerage API base URL.
    pub api_base_url: String,
    /// Crypto API base URL.
    pub crypto_base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// How long a paused handshake is kept.
    pub workflow_ttl: Duration,
    /// Token cache location.
    pub token_file: PathBuf,
}

impl ClientSettings {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a login variable is set but empty, or only one of
    /// username and password is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = non_empty(&lookup, "ROBINHOOD_USERNAME")?;
        let password = non_empty(&lookup, "ROBINHOOD_PASSWORD")?;
        let login = match (username, password) {
            (Some(username), Some(password)) => Some(LoginCredentials::new(username, password)),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("ROBINHOOD_PASSWORD".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("ROBINHOOD_USERNAME".to_string()));
            }
            (None, None) => None,
        };

        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            login,
            token: optional("ROBINHOOD_TOKEN"),
            device_token: optional("ROBINHOOD_DEVICE_TOKEN"),
            api_base_url: optional("ROBINHOOD_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            crypto_base_url: optional("ROBINHOOD_CRYPTO_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CRYPTO_BASE_URL.to_string()),
            timeout: parse_duration_secs(&lookup, "ROBINHOOD_TIMEOUT_SECS", DEFAULT_TIMEOUT),
            workflow_ttl: parse_duration_secs(
                &lookup,
                "ROBINHOOD_WORKFLOW_TTL_SECS",
                DEFAULT_WORKFLOW_TTL,
            ),
            token_file: optional("ROBINHOOD_TOKEN_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from),
        })
    }

    /// Password-grant credentials, or an error naming the missing variable.
    pub fn require_login(&self) -> Result<&LoginCredentials, ConfigError> {
        self.login
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("ROBINHOOD_USERNAME".to_string()))
    }

    /// Configured device token as a `DeviceId`.
    #[must_use]
    pub fn device_id(&self) -> Option<DeviceId> {
        self.device_token.clone().map(DeviceId::from)
    }

    /// HTTP adapter configuration.
    #[must_use]
    pub fn to_robinhood_config(&self) -> RobinhoodConfig {
        RobinhoodConfig::new()
            .with_api_base_url(self.api_base_url.clone())
            .with_crypto_base_url(self.crypto_base_url.clone())
            .with_timeout(self.timeout)
    }
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("login", &self.login)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("device_token", &self.device_token)
            .field("api_base_url", &self.api_base_url)
            .field("crypto_base_url", &self.crypto_base_url)
            .field("timeout", &self.timeout)
            .field("workflow_ttl", &self.workflow_ttl)
            .field("token_file", &self.token_file)
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

/// Load .env file from current directory or any ancestor directory.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key.to_string())),
        other => Ok(other),
    }
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<ClientSettings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = settings(&[]).unwrap();
        assert!(settings.login.is_none());
        assert!(settings.token.is_none());
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.crypto_base_url, DEFAULT_CRYPTO_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.workflow_ttl, DEFAULT_WORKFLOW_TTL);
        assert_eq!(settings.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
        assert!(matches!(
            settings.require_login(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn login_pair_is_loaded() {
        let settings = settings(&[
            ("ROBINHOOD_USERNAME", "user"),
            ("ROBINHOOD_PASSWORD", "pass"),
            ("ROBINHOOD_DEVICE_TOKEN", "dev-1"),
        ])
        .unwrap();
        let login = settings.require_login().unwrap();
        assert_eq!(login.username(), "user");
        assert_eq!(login.password(), "pass");
        assert_eq!(settings.device_id(), Some(DeviceId::new("dev-1")));
    }

    #[test]
    fn empty_username_is_rejected() {
        let err = settings(&[("ROBINHOOD_USERNAME", ""), ("ROBINHOOD_PASSWORD", "p")]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyValue("ROBINHOOD_USERNAME".to_string()));
    }

    #[test]
    fn username_without_password_is_rejected() {
        let err = settings(&[("ROBINHOOD_USERNAME", "user")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("ROBINHOOD_PASSWORD".to_string()));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings(&[
            ("ROBINHOOD_API_BASE_URL", "http://127.0.0.1:8080"),
            ("ROBINHOOD_TIMEOUT_SECS", "5"),
            ("ROBINHOOD_WORKFLOW_TTL_SECS", "120"),
            ("ROBINHOOD_TOKEN_FILE", "/tmp/token.json"),
            ("ROBINHOOD_TOKEN", "abc"),
        ])
        .unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.workflow_ttl, Duration::from_secs(120));
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.token_file, PathBuf::from("/tmp/token.json"));

        let config = settings.to_robinhood_config();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let settings = settings(&[("ROBINHOOD_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_redacts_secrets() {
        let settings = settings(&[
            ("ROBINHOOD_USERNAME", "user"),
            ("ROBINHOOD_PASSWORD", "hunter2"),
            ("ROBINHOOD_TOKEN", "tok-secret"),
        ])
        .unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok-secret"));
        assert!(debug.contains("user"));
    }
}
