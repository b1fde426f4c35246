//! HTTP client wrapper for the Robinhood web API.
//!
//! Sends the same browser-like headers as the web application. There is no
//! retry: every call is a single round-trip and any failure surfaces to the
//! caller.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::ErrorResponse;
use super::config::RobinhoodConfig;
use super::error::RobinhoodError;
use crate::domain::Credential;

const WEB_ORIGIN: &str = "https://robinhood.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// HTTP client for the Robinhood API.
#[derive(Clone)]
pub struct RobinhoodHttpClient {
    client: Client,
    config: RobinhoodConfig,
    bearer: Option<String>,
}

impl RobinhoodHttpClient {
    /// Create an unauthenticated client from config.
    pub fn new(config: RobinhoodConfig) -> Result<Self, RobinhoodError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers(&config)?)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RobinhoodError::Http(e.to_string()))?;

        Ok(Self {
            client,
            config,
            bearer: None,
        })
    }

    /// Authorize every request with `credential`.
    #[must_use]
    pub fn with_credential(mut self, credential: &Credential) -> Self {
        self.bearer = Some(credential.bearer_header());
        self
    }

    /// Drop the bearer token.
    #[must_use]
    pub fn without_credential(mut self) -> Self {
        self.bearer = None;
        self
    }

    /// The configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &RobinhoodConfig {
        &self.config
    }

    /// GET an absolute URL. Query pairs are appended only when present.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RobinhoodError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    /// POST a JSON body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, RobinhoodError> {
        self.send(self.client.post(url).json(body)).await
    }

    /// POST a form-encoded body.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, RobinhoodError> {
        self.send(self.client.post(url).form(form)).await
    }

    /// POST a form-encoded body and decode the response whatever its status.
    ///
    /// The token and challenge endpoints report failures in a JSON body
    /// alongside a 4xx status. A body that does not decode is reported as
    /// `RequestFailed` for non-success statuses.
    pub async fn post_form_lenient<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<(StatusCode, T), RobinhoodError> {
        let response = self
            .authorize(self.client.post(url).form(form))
            .send()
            .await
            .map_err(|e| RobinhoodError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RobinhoodError::Network(e.to_string()))?;

        match decode(&text) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(request_failed(status, text)),
            Err(e) => Err(e),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(bearer) => request.header(reqwest::header::AUTHORIZATION, bearer),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RobinhoodError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| RobinhoodError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RobinhoodError::Network(e.to_string()))?;

        if status.is_success() {
            return decode(&text);
        }

        tracing::debug!(status = status.as_u16(), "Robinhood request failed");
        Err(request_failed(status, text))
    }
}

impl std::fmt::Debug for RobinhoodHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobinhoodHttpClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("authenticated", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}

fn default_headers(config: &RobinhoodConfig) -> Result<HeaderMap, RobinhoodError> {
    let header = |value: &str| {
        HeaderValue::from_str(value).map_err(|e| RobinhoodError::Http(e.to_string()))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static("https://robinhood.com/"));
    headers.insert("X-Robinhood-API-Version", header(&config.api_version)?);
    headers.insert("X-TimeZone-Id", header(&config.timezone)?);
    Ok(headers)
}

/// Decode a response body; an empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, RobinhoodError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| RobinhoodError::JsonParse(e.to_string()))
}

fn request_failed(status: StatusCode, body: String) -> RobinhoodError {
    let body = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|err| err.detail)
        .unwrap_or(body);
    RobinhoodError::RequestFailed {
        status: status.as_u16(),
        body,
    }
}
