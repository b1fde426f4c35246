//! On-disk token cache.
//!
//! Stores the last issued credential as plain JSON so the binary can skip
//! the handshake while the token is still valid.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Credential, DeviceId};

/// Token cache errors.
#[derive(Debug, Error)]
pub enum TokenCacheError {
    /// Reading or writing the cache file failed.
    #[error("token cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache file is not valid JSON.
    #[error("token cache is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Bearer token.
    pub access_token: String,
    /// Refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Device token the credential was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
    /// Lifetime in seconds at issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl CachedToken {
    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        token_is_expired(&self.access_token, now)
    }

    /// Whether a refresh can be attempted.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
            && self.device_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Rebuild the credential.
    #[must_use]
    pub fn to_credential(&self) -> Credential {
        let mut credential = Credential::new(self.access_token.clone());
        if let Some(refresh_token) = &self.refresh_token {
            credential = credential.with_refresh_token(refresh_token.clone());
        }
        if let Some(device_token) = &self.device_token {
            credential = credential.with_device_id(DeviceId::new(device_token.clone()));
        }
        if let Some(token_type) = &self.token_type {
            credential = credential.with_token_type(token_type.clone());
        }
        if let Some(expires_in) = self.expires_in {
            credential = credential.with_expires_in(expires_in);
        }
        credential
    }
}

impl From<&Credential> for CachedToken {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token().to_string(),
            refresh_token: credential.refresh_token().map(str::to_string),
            device_token: credential.device_id().map(|id| id.as_str().to_string()),
            expires_in: credential.expires_in(),
            token_type: credential.token_type().map(str::to_string),
        }
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("device_token", &self.device_token)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// JSON file holding one `CachedToken`.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    /// Cache at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token. A missing file is `None`.
    pub fn load(&self) -> Result<Option<CachedToken>, TokenCacheError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Overwrite the cache with `token`.
    pub fn save(&self, token: &CachedToken) -> Result<(), TokenCacheError> {
        let contents = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), "Saved token cache");
        Ok(())
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, TokenCacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Whether a JWT access token has expired at `now`.
///
/// Reads the `exp` claim of the payload without verifying the signature.
/// Tokens that cannot be decoded count as expired.
#[must_use]
pub fn token_is_expired(access_token: &str, now: DateTime<Utc>) -> bool {
    jwt_expiry(access_token).is_none_or(|exp| now.timestamp() >= exp)
}

#[allow(clippy::cast_possible_truncation)]
fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}
