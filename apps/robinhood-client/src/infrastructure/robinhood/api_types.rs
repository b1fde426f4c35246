//! Robinhood API request/response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Credential, DeviceId, MarketHours, OrderRequest, OrderSide, OrderType, TimeInForce, Trigger,
};

/// Token endpoint response (login and refresh).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// Issued bearer token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Issued refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
    /// Verification workflow, when out-of-band verification is required.
    #[serde(default)]
    pub verification_workflow: Option<VerificationWorkflow>,
    /// Error detail.
    #[serde(default)]
    pub detail: Option<String>,
}

impl TokenResponse {
    /// Build a credential bound to `device_id`, if a token was issued.
    pub fn into_credential(self, device_id: &DeviceId) -> Option<Credential> {
        let access_token = self.access_token.filter(|t| !t.is_empty())?;
        let mut credential = Credential::new(access_token).with_device_id(device_id.clone());
        if let Some(refresh_token) = self.refresh_token {
            credential = credential.with_refresh_token(refresh_token);
        }
        if let Some(token_type) = self.token_type {
            credential = credential.with_token_type(token_type);
        }
        if let Some(expires_in) = self.expires_in {
            credential = credential.with_expires_in(expires_in);
        }
        if let Some(scope) = self.scope {
            credential = credential.with_scope(scope);
        }
        Some(credential)
    }
}

/// Verification workflow reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationWorkflow {
    /// Workflow id.
    pub id: String,
}

/// Machine registration request.
#[derive(Debug, Clone, Serialize)]
pub struct MachineRequest<'a> {
    /// Device identifier.
    pub device_id: &'a str,
    /// Flow name (always `suv`).
    pub flow: &'static str,
    /// Flow input.
    pub input: MachineInput<'a>,
}

/// Machine registration input.
#[derive(Debug, Clone, Serialize)]
pub struct MachineInput<'a> {
    /// Verification workflow id.
    pub workflow_id: &'a str,
}

/// Machine registration response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineResponse {
    /// Machine id.
    #[serde(default)]
    pub id: Option<String>,
}

/// Inquiry (challenge discovery) response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryResponse {
    /// Inquiry context.
    #[serde(default)]
    pub context: Option<InquiryContext>,
}

/// Inquiry context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryContext {
    /// Pending challenge.
    #[serde(default)]
    pub sheriff_challenge: Option<SheriffChallenge>,
}

/// Challenge descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct SheriffChallenge {
    /// Challenge id.
    pub id: String,
    /// Challenge type (`sms`, `prompt`, ...).
    #[serde(rename = "type")]
    pub challenge_type: String,
}

/// SMS challenge response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChallengeResponse {
    /// Challenge status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Push approval status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptStatusResponse {
    /// Challenge status.
    #[serde(default)]
    pub challenge_status: Option<String>,
}

/// Continuation acknowledgment body.
#[derive(Debug, Clone, Serialize)]
pub struct ContinueRequest {
    /// Sequence number (always 0).
    pub sequence: u32,
    /// User input.
    pub user_input: ContinueInput,
}

/// Continuation user input.
#[derive(Debug, Clone, Serialize)]
pub struct ContinueInput {
    /// Always `continue`.
    pub status: &'static str,
}

impl Default for ContinueRequest {
    fn default() -> Self {
        Self {
            sequence: 0,
            user_input: ContinueInput { status: "continue" },
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Items, in server order.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Absolute URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

/// Error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error detail.
    #[serde(default)]
    pub detail: Option<String>,
}

/// Order placement body.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBody {
    /// Account URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Instrument URL.
    pub instrument: String,
    /// Ticker symbol, upper-cased.
    pub symbol: String,
    /// Price.
    pub price: Decimal,
    /// Stop price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Quantity.
    pub quantity: Decimal,
    /// Side.
    pub side: OrderSide,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Trigger.
    pub trigger: Trigger,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Trading session.
    pub market_hours: MarketHours,
}

impl OrderBody {
    /// Wire body for `request` on `side`.
    #[must_use]
    pub fn new(request: &OrderRequest, side: OrderSide, account: Option<String>) -> Self {
        Self {
            account,
            instrument: request.instrument.url.clone(),
            symbol: request.instrument.symbol.to_uppercase(),
            price: request.price,
            stop_price: request.stop_price,
            quantity: request.quantity,
            side,
            time_in_force: request.time_in_force,
            trigger: request.trigger,
            order_type: request.order_type,
            market_hours: request.market_hours,
        }
    }
}

/// Token revocation body.
#[derive(Debug, Clone, Serialize)]
pub struct RevokeRequest<'a> {
    /// OAuth client id.
    pub client_id: &'a str,
    /// Token to revoke.
    pub token: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstrumentRef;

    #[test]
    fn token_response_with_workflow() {
        let json = r#"{"verification_workflow":{"id":"vw-1","workflow_status":"internal_pending"}}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.verification_workflow.unwrap().id, "vw-1");
        assert!(response.access_token.is_none());
    }

    #[test]
    fn token_response_into_credential() {
        let json = r#"{"access_token":"abc","refresh_token":"r","token_type":"Bearer","expires_in":86400,"scope":"internal"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let credential = response.into_credential(&DeviceId::new("dev")).unwrap();
        assert_eq!(credential.access_token(), "abc");
        assert_eq!(credential.refresh_token(), Some("r"));
        assert_eq!(credential.device_id().unwrap().as_str(), "dev");
        assert_eq!(credential.expires_in(), Some(86_400));
    }

    #[test]
    fn empty_access_token_is_no_credential() {
        let response = TokenResponse {
            access_token: Some(String::new()),
            ..TokenResponse::default()
        };
        assert!(response.into_credential(&DeviceId::new("dev")).is_none());
    }

    #[test]
    fn inquiry_response_parses_challenge() {
        let json = r#"{"context":{"sheriff_challenge":{"id":"c1","type":"sms","status":"issued"}}}"#;
        let response: InquiryResponse = serde_json::from_str(json).unwrap();
        let challenge = response.context.unwrap().sheriff_challenge.unwrap();
        assert_eq!(challenge.id, "c1");
        assert_eq!(challenge.challenge_type, "sms");
    }

    #[test]
    fn inquiry_response_without_context() {
        let response: InquiryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.context.is_none());
    }

    #[test]
    fn machine_request_shape() {
        let body = MachineRequest {
            device_id: "dev",
            flow: "suv",
            input: MachineInput {
                workflow_id: "vw-1",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"device_id":"dev","flow":"suv","input":{"workflow_id":"vw-1"}})
        );
    }

    #[test]
    fn continue_request_shape() {
        assert_eq!(
            serde_json::to_value(ContinueRequest::default()).unwrap(),
            serde_json::json!({"sequence":0,"user_input":{"status":"continue"}})
        );
    }

    #[test]
    fn page_defaults_missing_fields() {
        let page: Page<serde_json::Value> = serde_json::from_str(r#"{"results":[1,2]}"#).unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn order_body_uppercases_symbol() {
        let request = OrderRequest::limit(
            InstrumentRef {
                url: "https://api.robinhood.com/instruments/abc/".into(),
                symbol: "aapl".into(),
            },
            Decimal::new(15025, 2),
            Decimal::ONE,
        );
        let body = OrderBody::new(&request, OrderSide::Buy, Some("acct-url".into()));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["side"], "buy");
        assert_eq!(value["type"], "limit");
        assert_eq!(value["time_in_force"], "gfd");
        assert_eq!(value["price"], "150.25");
        assert!(value.get("stop_price").is_none());
    }
}
