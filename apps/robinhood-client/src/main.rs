//! Robinhood Client Binary
//!
//! Signs in (reusing or refreshing a cached token when possible) and prints
//! a quote.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin robinhood-client -- TSLA
//! ```
//!
//! # Environment Variables
//!
//! - `ROBINHOOD_USERNAME` / `ROBINHOOD_PASSWORD`: password grant credentials
//! - `ROBINHOOD_TOKEN`: use this access token instead of signing in
//! - `ROBINHOOD_DEVICE_TOKEN`: device token to reuse (default: random)
//! - `ROBINHOOD_API_BASE_URL`: API base URL (default: <https://api.robinhood.com/>)
//! - `ROBINHOOD_CRYPTO_BASE_URL`: crypto API base URL (default: <https://nummus.robinhood.com/>)
//! - `ROBINHOOD_TIMEOUT_SECS`: HTTP timeout (default: 30)
//! - `ROBINHOOD_WORKFLOW_TTL_SECS`: paused handshake lifetime (default: 600)
//! - `ROBINHOOD_TOKEN_FILE`: token cache path (default: robinhood_auth.json)
//! - `RUST_LOG`: Log level (default: info)

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use robinhood_client::infrastructure::config::load_dotenv;
use robinhood_client::{
    AuthError, Authenticator, CachedToken, ClientSettings, Credential, FileTokenCache,
    HandshakeOutcome, InMemoryWorkflowStore, RobinhoodApi, RobinhoodAuthAdapter, SignInRequest,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Challenge attempts before giving up on a handshake.
const MAX_CHALLENGE_ATTEMPTS: usize = 3;

type LiveAuthenticator = Authenticator<RobinhoodAuthAdapter, InMemoryWorkflowStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let settings = ClientSettings::from_env()?;
    tracing::info!(
        api_base_url = %settings.api_base_url,
        token_file = %settings.token_file.display(),
        "Configuration loaded"
    );

    let config = settings.to_robinhood_config();
    let gateway = Arc::new(RobinhoodAuthAdapter::new(config.clone())?);
    let store = Arc::new(InMemoryWorkflowStore::with_ttl(settings.workflow_ttl));
    let authenticator = Authenticator::new(gateway, store);
    let cache = FileTokenCache::new(&settings.token_file);

    let credential = obtain_credential(&settings, &cache, &authenticator).await?;
    if let Err(e) = cache.save(&CachedToken::from(&credential)) {
        tracing::warn!(error = %e, "Failed to save token cache");
    }

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let api = RobinhoodApi::new(config, credential)?;
    let quotes = api
        .quote_data(&[symbol.as_str()])
        .await
        .with_context(|| format!("failed to fetch quote for {symbol}"))?;

    println!("{}", serde_json::to_string_pretty(&quotes)?);
    Ok(())
}

/// Configured token, then a valid or refreshable cached token, then the
/// password handshake.
async fn obtain_credential(
    settings: &ClientSettings,
    cache: &FileTokenCache,
    authenticator: &LiveAuthenticator,
) -> anyhow::Result<Credential> {
    if let Some(token) = &settings.token {
        let mut request = SignInRequest::token(token.clone());
        if let Some(device_id) = settings.device_id() {
            request = request.with_device_id(device_id);
        }
        if let HandshakeOutcome::Authenticated(credential) = authenticator.sign_in(request).await? {
            return Ok(credential);
        }
    }

    let cached = match cache.load() {
        Ok(cached) => cached,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable token cache");
            None
        }
    };

    if let Some(cached) = &cached {
        if !cached.is_expired(Utc::now()) {
            tracing::info!("Using cached access token");
            return Ok(cached.to_credential());
        }
        if cached.can_refresh() {
            match authenticator.refresh(&cached.to_credential()).await {
                Ok(credential) => {
                    tracing::info!("Refreshed cached access token");
                    return Ok(credential);
                }
                Err(e) => tracing::warn!(error = %e, "Token refresh failed, signing in"),
            }
        }
    }

    let login = settings.require_login()?;
    let device_id = settings.device_id().or_else(|| {
        cached
            .as_ref()
            .and_then(|c| c.device_token.clone())
            .map(Into::into)
    });

    let mut request = SignInRequest::password(login.username(), login.password());
    if let Some(device_id) = device_id {
        request = request.with_device_id(device_id);
    }

    match authenticator.sign_in(request).await? {
        HandshakeOutcome::Authenticated(credential) => Ok(credential),
        HandshakeOutcome::Failed { message } => bail!("login failed: {message}"),
        HandshakeOutcome::AwaitingInput(pending) => {
            let workflow_id = pending.workflow_id;
            let mut stdin = BufReader::new(tokio::io::stdin()).lines();

            for attempt in 1..=MAX_CHALLENGE_ATTEMPTS {
                print!("{} ", pending.message);
                std::io::stdout().flush()?;
                let input = stdin.next_line().await?.unwrap_or_default();

                match authenticator
                    .resolve_challenge(&workflow_id, Some(input.trim()))
                    .await
                {
                    Ok(HandshakeOutcome::Authenticated(credential)) => return Ok(credential),
                    Ok(other) => bail!("unexpected handshake status: {}", other.status()),
                    Err(AuthError::ChallengeRejected { status, .. }) => {
                        tracing::warn!(attempt, status = %status, "Challenge rejected");
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            authenticator.abandon(&workflow_id);
            bail!("challenge not validated after {MAX_CHALLENGE_ATTEMPTS} attempts")
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "robinhood_client=info"
                    .parse()
                    .expect("static directive 'robinhood_client=info' is valid"),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}
