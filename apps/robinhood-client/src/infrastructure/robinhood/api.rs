//! Authenticated resource endpoints.
//!
//! Payloads are returned as opaque JSON. List endpoints go through
//! `fetch_all`, so they return only the first page unless a budget is
//! given.

use serde::Serialize;
use serde_json::{Value, json};

use super::api_types::{OrderBody, RevokeRequest};
use super::config::RobinhoodConfig;
use super::endpoints;
use super::error::RobinhoodError;
use super::http_client::RobinhoodHttpClient;
use super::pagination;
use crate::domain::{Credential, OrderRequest, OrderSide};

/// Filter for `earnings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarningsQuery {
    /// Reports for one instrument URL.
    Instrument(String),
    /// Reports for one ticker.
    Symbol(String),
    /// Reports within the next `n` days.
    Range(u32),
}

/// Filter and page budget for `orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersQuery {
    /// Only orders updated at or after this timestamp.
    pub updated_since: Option<String>,
    /// Extra pages to follow.
    pub page_budget: Option<u32>,
}

/// Direction for `sp500_movers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverDirection {
    /// Top gainers.
    Up,
    /// Top losers.
    Down,
}

impl MoverDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Contract type for `options_available`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionType {
    /// Calls.
    Call,
    /// Puts.
    #[default]
    Put,
}

impl OptionType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

/// Order to cancel: a bare id or a previously fetched order payload.
#[derive(Debug, Clone, Copy)]
pub enum OrderRef<'a> {
    /// Order id.
    Id(&'a str),
    /// Order payload carrying a `cancel` link.
    Order(&'a Value),
}

/// Typed facade over the resource endpoints.
#[derive(Debug, Clone)]
pub struct RobinhoodApi {
    client: RobinhoodHttpClient,
    credential: Credential,
    account: Option<String>,
}

impl RobinhoodApi {
    /// Create a facade authorized with `credential`.
    pub fn new(config: RobinhoodConfig, credential: Credential) -> Result<Self, RobinhoodError> {
        Ok(Self::with_client(RobinhoodHttpClient::new(config)?, credential))
    }

    /// Create a facade over an existing client.
    #[must_use]
    pub fn with_client(client: RobinhoodHttpClient, credential: Credential) -> Self {
        Self {
            client: client.with_credential(&credential),
            credential,
            account: None,
        }
    }

    /// Replace the credential, e.g. after a refresh.
    #[must_use]
    pub fn with_credential(self, credential: Credential) -> Self {
        Self {
            client: self.client.with_credential(&credential),
            credential,
            account: self.account,
        }
    }

    /// The credential authorizing requests.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Account URL attached to new orders, once `set_account` has run.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    fn api_url(&self, path: &str) -> String {
        self.client.config().api_url(path)
    }

    fn crypto_url(&self, path: &str) -> String {
        self.client.config().crypto_url(path)
    }

    /// Drain any list endpoint; see `pagination::fetch_all`.
    pub async fn fetch_all(
        &self,
        url: &str,
        query: &[(&str, &str)],
        page_budget: Option<u32>,
    ) -> Result<Vec<Value>, RobinhoodError> {
        pagination::fetch_all(&self.client, url, query, page_budget).await
    }

    async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, RobinhoodError> {
        self.client.get(url, query).await
    }

    async fn write<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value, RobinhoodError> {
        self.client
            .post_json(url, body)
            .await
            .map_err(|err| match err {
                RobinhoodError::RequestFailed { status, body } => {
                    RobinhoodError::OrderRejected(format!("status {status}: {body}"))
                }
                other => other,
            })
    }

    // Account

    /// Brokerage accounts.
    pub async fn accounts(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(&self.api_url(endpoints::ACCOUNTS), &[], None)
            .await
    }

    /// Remember the first account's URL for subsequent orders.
    pub async fn set_account(&mut self) -> Result<Option<&str>, RobinhoodError> {
        let accounts = self.accounts().await?;
        if let Some(url) = accounts
            .first()
            .and_then(|account| account.get("url"))
            .and_then(Value::as_str)
        {
            self.account = Some(url.to_string());
        }
        Ok(self.account.as_deref())
    }

    /// The signed-in user.
    pub async fn user(&self) -> Result<Value, RobinhoodError> {
        self.fetch(&self.api_url(endpoints::USER), &[]).await
    }

    /// Investment profile of the signed-in user.
    pub async fn investment_profile(&self) -> Result<Value, RobinhoodError> {
        self.fetch(&self.api_url(endpoints::INVESTMENT_PROFILE), &[])
            .await
    }

    /// Dividend history.
    pub async fn dividends(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(&self.api_url(endpoints::DIVIDENDS), &[], None)
            .await
    }

    /// Earnings reports.
    pub async fn earnings(&self, query: &EarningsQuery) -> Result<Vec<Value>, RobinhoodError> {
        let range;
        let params: [(&str, &str); 1] = match query {
            EarningsQuery::Instrument(url) => [("instrument", url.as_str())],
            EarningsQuery::Symbol(symbol) => [("symbol", symbol.as_str())],
            EarningsQuery::Range(days) => {
                range = format!("{days}day");
                [("range", range.as_str())]
            }
        };
        self.fetch_all(&self.api_url(endpoints::EARNINGS), &params, None)
            .await
    }

    /// Order history.
    pub async fn orders(&self, query: &OrdersQuery) -> Result<Vec<Value>, RobinhoodError> {
        let mut params = Vec::new();
        if let Some(since) = query.updated_since.as_deref() {
            params.push(("updated_at[gte]", since));
        }
        self.fetch_all(&self.api_url(endpoints::ORDERS), &params, query.page_budget)
            .await
    }

    /// All positions, including closed ones.
    pub async fn positions(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(&self.api_url(endpoints::POSITIONS), &[], None)
            .await
    }

    /// Positions with a non-zero quantity.
    pub async fn nonzero_positions(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(
            &self.api_url(endpoints::POSITIONS),
            &[("nonzero", "true")],
            None,
        )
        .await
    }

    // Orders

    /// Place a buy order.
    pub async fn place_buy_order(&self, order: &OrderRequest) -> Result<Value, RobinhoodError> {
        self.place_order(order, OrderSide::Buy).await
    }

    /// Place a sell order.
    pub async fn place_sell_order(&self, order: &OrderRequest) -> Result<Value, RobinhoodError> {
        self.place_order(order, OrderSide::Sell).await
    }

    async fn place_order(
        &self,
        order: &OrderRequest,
        side: OrderSide,
    ) -> Result<Value, RobinhoodError> {
        let body = OrderBody::new(order, side, self.account.clone());
        tracing::info!(
            symbol = %body.symbol,
            side = ?side,
            quantity = %body.quantity,
            "Placing order"
        );
        self.write(&self.api_url(endpoints::ORDERS), &body).await
    }

    /// Cancel an order by id, or through the `cancel` link of its payload.
    pub async fn cancel_order(&self, order: OrderRef<'_>) -> Result<Value, RobinhoodError> {
        let url = match order {
            OrderRef::Id(id) if !id.is_empty() => self.api_url(&endpoints::cancel_order(id)),
            OrderRef::Id(_) => {
                return Err(RobinhoodError::OrderNotCancelable {
                    reason: "empty order id".to_string(),
                });
            }
            OrderRef::Order(payload) => match payload.get("cancel").and_then(Value::as_str) {
                Some(link) if !link.is_empty() => link.to_string(),
                _ => {
                    let reason = if payload.get("state").and_then(Value::as_str) == Some("cancelled")
                    {
                        "order already cancelled"
                    } else {
                        "order has no cancel link"
                    };
                    return Err(RobinhoodError::OrderNotCancelable {
                        reason: reason.to_string(),
                    });
                }
            },
        };
        tracing::info!(url = %url, "Cancelling order");
        self.write(&url, &json!({})).await
    }

    // Market data

    /// Quotes for one or more symbols.
    pub async fn quote_data(&self, symbols: &[&str]) -> Result<Vec<Value>, RobinhoodError> {
        let symbols = symbols.join(",").to_uppercase();
        self.fetch_all(
            &self.api_url(endpoints::QUOTES),
            &[("symbols", symbols.as_str())],
            None,
        )
        .await
    }

    /// Fundamentals for a ticker.
    pub async fn fundamentals(&self, ticker: &str) -> Result<Value, RobinhoodError> {
        let path = format!("{}{}/", endpoints::FUNDAMENTALS, ticker.to_uppercase());
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Popularity of the instrument behind `symbol`.
    pub async fn popularity(&self, symbol: &str) -> Result<Value, RobinhoodError> {
        let quotes = self.quote_data(&[symbol]).await?;
        let instrument_id = quotes
            .first()
            .and_then(|quote| quote.get("instrument"))
            .and_then(Value::as_str)
            .and_then(last_path_segment)
            .ok_or_else(|| RobinhoodError::SymbolNotFound {
                symbol: symbol.to_string(),
                available: Vec::new(),
            })?;
        let path = format!("{}{instrument_id}/popularity/", endpoints::INSTRUMENTS);
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Instrument by id.
    pub async fn instrument_by_id(&self, id: &str) -> Result<Value, RobinhoodError> {
        let path = format!("{}{id}/", endpoints::INSTRUMENTS);
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Instruments matching a symbol.
    pub async fn instruments(&self, symbol: &str) -> Result<Vec<Value>, RobinhoodError> {
        let query = symbol.to_uppercase();
        self.fetch_all(
            &self.api_url(endpoints::INSTRUMENTS),
            &[("query", query.as_str())],
            None,
        )
        .await
    }

    /// Stock splits of an instrument.
    pub async fn splits(&self, instrument_id: &str) -> Result<Value, RobinhoodError> {
        let path = format!("{}{instrument_id}/splits/", endpoints::INSTRUMENTS);
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Historical bars for a symbol.
    pub async fn historicals(
        &self,
        symbol: &str,
        interval: &str,
        span: &str,
    ) -> Result<Value, RobinhoodError> {
        let path = format!(
            "{}historicals/{}/",
            endpoints::QUOTES,
            symbol.to_uppercase()
        );
        self.fetch(
            &self.api_url(&path),
            &[("interval", interval), ("span", span)],
        )
        .await
    }

    /// S&P 500 top movers.
    pub async fn sp500_movers(
        &self,
        direction: MoverDirection,
    ) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(
            &self.api_url(endpoints::SP500_MOVERS),
            &[("direction", direction.as_str())],
            None,
        )
        .await
    }

    /// News for a symbol.
    pub async fn news(&self, symbol: &str) -> Result<Value, RobinhoodError> {
        let path = format!("{}{}/", endpoints::NEWS, symbol.to_uppercase());
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Instruments under a collection tag.
    pub async fn tag(&self, tag: &str) -> Result<Value, RobinhoodError> {
        let path = format!("{}{tag}/", endpoints::TAG);
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// GET any absolute URL with this credential.
    pub async fn url(&self, url: &str) -> Result<Value, RobinhoodError> {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(RobinhoodError::InvalidUrl(url.to_string()));
        }
        self.fetch(url, &[]).await
    }

    // Watchlists

    /// Watchlists of the signed-in user.
    pub async fn watchlists(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(&self.api_url(endpoints::WATCHLISTS), &[], None)
            .await
    }

    /// Create a watchlist.
    pub async fn create_watchlist(&self, name: &str) -> Result<Value, RobinhoodError> {
        self.write(&self.api_url(endpoints::WATCHLISTS), &json!({ "name": name }))
            .await
    }

    // Crypto

    /// Crypto holdings.
    pub async fn crypto_holdings(&self) -> Result<Vec<Value>, RobinhoodError> {
        self.fetch_all(&self.crypto_url(endpoints::CRYPTO_HOLDINGS), &[], None)
            .await
    }

    /// Tradable currency pairs.
    pub async fn currency_pairs(&self) -> Result<Value, RobinhoodError> {
        self.fetch(&self.crypto_url(endpoints::CURRENCY_PAIRS), &[])
            .await
    }

    /// Quote for a crypto asset code such as `BTC`.
    pub async fn crypto_quote(&self, symbol: &str) -> Result<Value, RobinhoodError> {
        let pairs = self.currency_pairs().await?;
        let results = pairs
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let code_of = |pair: &Value| {
            pair.get("asset_currency")
                .and_then(|currency| currency.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let pair_id = results
            .iter()
            .find(|pair| code_of(pair).is_some_and(|code| code.eq_ignore_ascii_case(symbol)))
            .and_then(|pair| pair.get("id"))
            .and_then(Value::as_str);

        let Some(pair_id) = pair_id else {
            return Err(RobinhoodError::SymbolNotFound {
                symbol: symbol.to_string(),
                available: results.iter().filter_map(code_of).collect(),
            });
        };

        let path = format!("{}{pair_id}/", endpoints::CRYPTO_QUOTES);
        self.fetch(&self.api_url(&path), &[]).await
    }

    // Options

    /// Aggregate options positions.
    pub async fn options_positions(&self) -> Result<Value, RobinhoodError> {
        self.fetch(&self.api_url(endpoints::OPTIONS_POSITIONS), &[])
            .await
    }

    /// Options orders.
    pub async fn options_orders(&self) -> Result<Value, RobinhoodError> {
        self.fetch(&self.api_url(endpoints::OPTIONS_ORDERS), &[])
            .await
    }

    /// Options chain (with expiration dates) for a symbol.
    pub async fn options_dates(&self, symbol: &str) -> Result<Value, RobinhoodError> {
        let instruments = self.instruments(symbol).await?;
        let chain_id = instruments
            .first()
            .and_then(|instrument| instrument.get("tradable_chain_id"))
            .and_then(Value::as_str)
            .ok_or_else(|| RobinhoodError::SymbolNotFound {
                symbol: symbol.to_string(),
                available: Vec::new(),
            })?;
        let path = format!("{}{chain_id}/", endpoints::OPTIONS_CHAINS);
        self.fetch(&self.api_url(&path), &[]).await
    }

    /// Active, tradable contracts of a chain for one expiration date.
    pub async fn options_available(
        &self,
        chain_id: &str,
        expiration_date: &str,
        option_type: OptionType,
    ) -> Result<Value, RobinhoodError> {
        self.fetch(
            &self.api_url(endpoints::OPTIONS_INSTRUMENTS),
            &[
                ("chain_id", chain_id),
                ("type", option_type.as_str()),
                ("expiration_date", expiration_date),
                ("state", "active"),
                ("tradability", "tradable"),
            ],
        )
        .await
    }

    // Session

    /// Revoke the refresh token (or the access token when there is none).
    pub async fn expire_token(&self) -> Result<Value, RobinhoodError> {
        let token = self
            .credential
            .refresh_token()
            .unwrap_or_else(|| self.credential.access_token());
        let body = RevokeRequest {
            client_id: &self.client.config().client_id,
            token,
        };
        tracing::info!("Revoking token");
        self.client
            .post_json(&self.api_url(endpoints::LOGOUT), &body)
            .await
    }
}

fn last_path_segment(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}
