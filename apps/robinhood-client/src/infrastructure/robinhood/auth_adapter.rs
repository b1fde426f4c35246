//! Robinhood Auth Adapter
//!
//! Implements `AuthGateway` against the token, pathfinder, challenge, and
//! push endpoints.

use async_trait::async_trait;

use super::api_types::{
    ChallengeResponse, ContinueRequest, InquiryResponse, MachineInput, MachineRequest,
    MachineResponse, PromptStatusResponse, TokenResponse,
};
use super::config::RobinhoodConfig;
use super::endpoints;
use super::error::RobinhoodError;
use super::http_client::RobinhoodHttpClient;
use crate::application::ports::{AuthError, AuthGateway, ChallengeStatus, LoginAttempt, LoginReply};
use crate::domain::{
    Challenge, ChallengeId, ChallengeKind, DeviceId, LoginSecret, MachineId,
    VerificationWorkflowId,
};

/// `AuthGateway` backed by the Robinhood web API.
#[derive(Debug, Clone)]
pub struct RobinhoodAuthAdapter {
    client: RobinhoodHttpClient,
}

impl RobinhoodAuthAdapter {
    /// Create an adapter with its own unauthenticated HTTP client.
    pub fn new(config: RobinhoodConfig) -> Result<Self, RobinhoodError> {
        Ok(Self::with_client(RobinhoodHttpClient::new(config)?))
    }

    /// Create an adapter over an existing client. Any bearer token is dropped.
    #[must_use]
    pub fn with_client(client: RobinhoodHttpClient) -> Self {
        Self {
            client: client.without_credential(),
        }
    }

    fn config(&self) -> &RobinhoodConfig {
        self.client.config()
    }

    fn login_form<'a>(
        &'a self,
        secret: &'a LoginSecret,
        device_id: &'a DeviceId,
        expires_in: &'a str,
        attempt: LoginAttempt,
    ) -> Vec<(&'a str, &'a str)> {
        let session = &self.config().session;
        let mut form = vec![
            ("client_id", self.config().client_id.as_str()),
            ("grant_type", "password"),
            ("username", secret.username()),
            ("password", secret.password()),
            ("device_token", device_id.as_str()),
            ("scope", session.scope.as_str()),
            ("expires_in", expires_in),
            ("long_session", bool_str(session.long_session)),
            ("create_read_only_secondary_token", "true"),
            ("token_request_path", "/login"),
            ("try_passkeys", "false"),
        ];
        if attempt == LoginAttempt::Initial {
            form.push(("challenge_type", session.challenge_type.as_str()));
        }
        form
    }
}

const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn classify(response: TokenResponse, status: u16, device_id: &DeviceId) -> LoginReply {
    if let Some(workflow) = response.verification_workflow.as_ref() {
        return LoginReply::Verification(VerificationWorkflowId::new(workflow.id.clone()));
    }
    let detail = response.detail.clone();
    match response.into_credential(device_id) {
        Some(credential) => LoginReply::Token(credential),
        None => LoginReply::Rejected {
            detail: detail.unwrap_or_else(|| format!("login rejected with status {status}")),
        },
    }
}

#[async_trait]
impl AuthGateway for RobinhoodAuthAdapter {
    async fn login(
        &self,
        secret: &LoginSecret,
        device_id: &DeviceId,
        attempt: LoginAttempt,
    ) -> Result<LoginReply, AuthError> {
        let url = self.config().api_url(endpoints::LOGIN);
        let expires_in = self.config().session.expires_in.to_string();
        let form = self.login_form(secret, device_id, &expires_in, attempt);

        tracing::debug!(device_id = %device_id, ?attempt, "Submitting password grant");
        let (status, response): (_, TokenResponse) =
            self.client.post_form_lenient(&url, &form).await?;

        Ok(classify(response, status.as_u16(), device_id))
    }

    async fn register_machine(
        &self,
        device_id: &DeviceId,
        workflow: &VerificationWorkflowId,
    ) -> Result<Option<MachineId>, AuthError> {
        let url = self.config().api_url(endpoints::USER_MACHINE);
        let body = MachineRequest {
            device_id: device_id.as_str(),
            flow: "suv",
            input: MachineInput {
                workflow_id: workflow.as_str(),
            },
        };

        let response: MachineResponse = self.client.post_json(&url, &body).await?;
        Ok(response
            .id
            .filter(|id| !id.is_empty())
            .map(MachineId::new))
    }

    async fn fetch_challenge(&self, machine_id: &MachineId) -> Result<Option<Challenge>, AuthError> {
        let url = self
            .config()
            .api_url(&endpoints::inquiry(machine_id.as_str()));

        let response: InquiryResponse = self.client.get(&url, &[]).await?;
        Ok(response
            .context
            .and_then(|context| context.sheriff_challenge)
            .filter(|challenge| !challenge.id.is_empty())
            .map(|challenge| {
                Challenge::new(
                    ChallengeId::new(challenge.id),
                    ChallengeKind::parse(&challenge.challenge_type),
                )
            }))
    }

    async fn respond_to_challenge(
        &self,
        challenge_id: &ChallengeId,
        response: &str,
    ) -> Result<ChallengeStatus, AuthError> {
        let url = self
            .config()
            .api_url(&endpoints::challenge_respond(challenge_id.as_str()));

        let (_, reply): (_, ChallengeResponse) = self
            .client
            .post_form_lenient(&url, &[("response", response)])
            .await?;
        Ok(ChallengeStatus::from_wire(reply.status.as_deref()))
    }

    async fn prompt_status(&self, challenge_id: &ChallengeId) -> Result<ChallengeStatus, AuthError> {
        let url = self
            .config()
            .api_url(&endpoints::prompt_status(challenge_id.as_str()));

        let reply: PromptStatusResponse = self.client.get(&url, &[]).await?;
        Ok(ChallengeStatus::from_wire(reply.challenge_status.as_deref()))
    }

    async fn acknowledge(&self, machine_id: &MachineId) -> Result<(), AuthError> {
        let url = self
            .config()
            .api_url(&endpoints::inquiry(machine_id.as_str()));

        let _: serde_json::Value = self
            .client
            .post_json(&url, &ContinueRequest::default())
            .await?;
        Ok(())
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        device_id: &DeviceId,
    ) -> Result<LoginReply, AuthError> {
        let url = self.config().api_url(endpoints::LOGIN);
        let session = &self.config().session;
        let expires_in = session.expires_in.to_string();
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config().client_id.as_str()),
            ("scope", session.scope.as_str()),
            ("expires_in", expires_in.as_str()),
            ("device_token", device_id.as_str()),
        ];

        let response: TokenResponse = self.client.post_form(&url, &form).await?;
        Ok(classify(response, 200, device_id))
    }
}
