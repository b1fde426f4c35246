//! Login Handshake Service
//!
//! Drives the multi-step login:
//!
//! 1. Password grant with a device identifier.
//! 2. If the server asks for verification: register the machine, discover
//!    the challenge, park a `WorkflowState`, and return `AwaitingInput`.
//! 3. The caller collects the SMS code (or waits for push approval) and
//!    calls `resolve_challenge` with the workflow identifier.
//! 4. Once the challenge is validated the state is taken out of the store
//!    and finalized: continuation acknowledgment, then a second password
//!    grant with the same device identifier.
//!
//! Every step is a single round-trip with no internal retry. The only
//! suspension point is between steps 2 and 3, during which nothing runs.

use std::sync::Arc;

use crate::application::ports::{
    AuthError, AuthGateway, ChallengeStatus, DeviceIdSource, LoginAttempt, LoginReply,
    RandomDeviceIds, WorkflowStore,
};
use crate::domain::{
    ChallengeKind, Credential, DeviceId, HandshakeOutcome, LoginSecret, PendingChallenge,
    SignInRequest, WorkflowId, WorkflowState,
};

/// Authentication orchestrator, challenge resolver, and finalizer.
pub struct Authenticator<G, S>
where
    G: AuthGateway,
    S: WorkflowStore,
{
    gateway: Arc<G>,
    store: Arc<S>,
    device_ids: Arc<dyn DeviceIdSource>,
}

impl<G, S> Authenticator<G, S>
where
    G: AuthGateway,
    S: WorkflowStore,
{
    /// Create an authenticator with random device identifiers.
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self::with_device_ids(gateway, store, Arc::new(RandomDeviceIds))
    }

    /// Create an authenticator with a custom device identifier source.
    pub fn with_device_ids(
        gateway: Arc<G>,
        store: Arc<S>,
        device_ids: Arc<dyn DeviceIdSource>,
    ) -> Self {
        Self {
            gateway,
            store,
            device_ids,
        }
    }

    /// The workflow store backing this authenticator.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Credential entry point.
    ///
    /// A stored token is accepted as-is; a username/password pair runs the
    /// handshake.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<HandshakeOutcome, AuthError> {
        match request {
            SignInRequest::Token {
                access_token,
                refresh_token,
                device_id,
            } => {
                if access_token.trim().is_empty() {
                    return Err(AuthError::MissingCredentials(
                        "access token is empty".to_string(),
                    ));
                }
                tracing::info!("Using provided access token");
                let mut credential = Credential::new(access_token);
                if let Some(refresh_token) = refresh_token {
                    credential = credential.with_refresh_token(refresh_token);
                }
                if let Some(device_id) = device_id {
                    credential = credential.with_device_id(device_id);
                }
                Ok(HandshakeOutcome::Authenticated(credential))
            }
            SignInRequest::Password {
                username,
                password,
                device_id,
            } => self.start_handshake(username, password, device_id).await,
        }
    }

    /// Submit credentials and either obtain a token or pause for a challenge.
    pub async fn start_handshake(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        device_id: Option<DeviceId>,
    ) -> Result<HandshakeOutcome, AuthError> {
        let secret = LoginSecret::new(username, password);
        if secret.is_incomplete() {
            return Err(AuthError::MissingCredentials(
                "username and password are required".to_string(),
            ));
        }

        let device_id = device_id.unwrap_or_else(|| self.device_ids.next_device_id());
        tracing::info!(device_id = %device_id, "Starting login handshake");

        let reply = self
            .gateway
            .login(&secret, &device_id, LoginAttempt::Initial)
            .await?;

        match reply {
            LoginReply::Token(credential) => {
                tracing::info!(device_id = %device_id, "Login succeeded without verification");
                Ok(HandshakeOutcome::Authenticated(credential))
            }
            LoginReply::Verification(verification_workflow_id) => {
                tracing::info!(
                    verification_workflow_id = %verification_workflow_id,
                    "Login requires verification"
                );

                let machine_id = self
                    .gateway
                    .register_machine(&device_id, &verification_workflow_id)
                    .await?
                    .ok_or_else(|| AuthError::ChallengeDiscoveryFailed {
                        reason: "machine registration returned no id".to_string(),
                    })?;

                let challenge = self
                    .gateway
                    .fetch_challenge(&machine_id)
                    .await?
                    .ok_or_else(|| AuthError::ChallengeDiscoveryFailed {
                        reason: "no pending challenge for machine".to_string(),
                    })?;

                let workflow_id = WorkflowId::generate();
                let pending = PendingChallenge {
                    workflow_id: workflow_id.clone(),
                    message: challenge.kind.prompt().to_string(),
                    auth_type: challenge.kind.auth_type(),
                };

                tracing::info!(
                    workflow_id = %workflow_id,
                    machine_id = %machine_id,
                    challenge_id = %challenge.id,
                    challenge_kind = %challenge.kind,
                    "Awaiting challenge resolution"
                );

                self.store.insert(WorkflowState {
                    workflow_id,
                    verification_workflow_id,
                    machine_id,
                    device_id,
                    challenge,
                    secret,
                });

                Ok(HandshakeOutcome::AwaitingInput(pending))
            }
            LoginReply::Rejected { detail } => {
                tracing::warn!(detail = %detail, "Login rejected");
                Ok(HandshakeOutcome::Failed { message: detail })
            }
        }
    }

    /// Resolve a paused handshake.
    ///
    /// `user_input` is the SMS code; it is ignored for push approval. A
    /// rejected challenge leaves the workflow in place so the caller can try
    /// again with the same identifier.
    pub async fn resolve_challenge(
        &self,
        workflow_id: &WorkflowId,
        user_input: Option<&str>,
    ) -> Result<HandshakeOutcome, AuthError> {
        let challenge =
            self.store
                .challenge(workflow_id)
                .ok_or_else(|| AuthError::UnknownWorkflow {
                    workflow_id: workflow_id.clone(),
                })?;

        let status = match &challenge.kind {
            ChallengeKind::Sms => {
                tracing::info!(workflow_id = %workflow_id, "Submitting SMS code");
                self.gateway
                    .respond_to_challenge(&challenge.id, user_input.unwrap_or_default())
                    .await?
            }
            ChallengeKind::Push | ChallengeKind::Other(_) => {
                tracing::info!(workflow_id = %workflow_id, "Checking device approval");
                self.gateway.prompt_status(&challenge.id).await?
            }
        };

        if let ChallengeStatus::NotValidated(status) = status {
            tracing::warn!(
                workflow_id = %workflow_id,
                challenge_kind = %challenge.kind,
                status = %status,
                "Challenge not validated"
            );
            return Err(AuthError::ChallengeRejected {
                kind: challenge.kind.to_string(),
                status,
            });
        }

        let state = self
            .store
            .take(workflow_id)
            .ok_or_else(|| AuthError::UnknownWorkflow {
                workflow_id: workflow_id.clone(),
            })?;

        let credential = self.finalize(state).await?;
        Ok(HandshakeOutcome::Authenticated(credential))
    }

    /// Finish a handshake whose challenge has been validated.
    ///
    /// Consumes the state; the login secret is dropped when this returns,
    /// whatever the outcome.
    pub async fn finalize(&self, state: WorkflowState) -> Result<Credential, AuthError> {
        let WorkflowState {
            workflow_id,
            machine_id,
            device_id,
            secret,
            ..
        } = state;

        tracing::info!(workflow_id = %workflow_id, "Challenge validated, finalizing");
        self.gateway.acknowledge(&machine_id).await?;

        let reply = self
            .gateway
            .login(&secret, &device_id, LoginAttempt::Finalize)
            .await;
        drop(secret);

        match reply? {
            LoginReply::Token(credential) if !credential.access_token().is_empty() => {
                tracing::info!(workflow_id = %workflow_id, "Login handshake complete");
                Ok(credential)
            }
            LoginReply::Token(_) => Err(AuthError::TokenIssuanceFailed {
                detail: "empty access token".to_string(),
            }),
            LoginReply::Verification(_) => Err(AuthError::TokenIssuanceFailed {
                detail: "server requested another verification".to_string(),
            }),
            LoginReply::Rejected { detail } => Err(AuthError::TokenIssuanceFailed { detail }),
        }
    }

    /// Exchange the refresh token of `credential` for a new credential.
    pub async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError> {
        let refresh_token = credential
            .refresh_token()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::MissingCredentials("no refresh token".to_string()))?;
        let device_id = credential
            .device_id()
            .ok_or_else(|| AuthError::MissingCredentials("no device id".to_string()))?;

        tracing::info!(device_id = %device_id, "Refreshing access token");

        match self.gateway.refresh(refresh_token, device_id).await? {
            LoginReply::Token(refreshed) if !refreshed.access_token().is_empty() => Ok(refreshed),
            LoginReply::Token(_) => Err(AuthError::TokenIssuanceFailed {
                detail: "empty access token".to_string(),
            }),
            LoginReply::Verification(_) => Err(AuthError::TokenIssuanceFailed {
                detail: "refresh requested verification".to_string(),
            }),
            LoginReply::Rejected { detail } => Err(AuthError::TokenIssuanceFailed { detail }),
        }
    }

    /// Drop a paused handshake the caller no longer intends to finish.
    pub fn abandon(&self, workflow_id: &WorkflowId) -> bool {
        let removed = self.store.remove(workflow_id);
        if removed {
            tracing::info!(workflow_id = %workflow_id, "Login workflow abandoned");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::domain::{AuthType, Challenge, ChallengeId, MachineId, VerificationWorkflowId};
    use crate::infrastructure::persistence::InMemoryWorkflowStore;

    /// Scripted gateway recording every call.
    #[derive(Default)]
    struct FakeGateway {
        login_replies: Mutex<VecDeque<LoginReply>>,
        machine_id: Option<MachineId>,
        challenge: Option<Challenge>,
        valid_code: String,
        push_status: Mutex<String>,
        refresh_reply: Option<LoginReply>,
        calls: Mutex<Vec<String>>,
        finalize_devices: Mutex<Vec<DeviceId>>,
    }

    impl FakeGateway {
        fn token(token: &str) -> Self {
            Self {
                login_replies: Mutex::new(VecDeque::from([LoginReply::Token(Credential::new(
                    token,
                ))])),
                ..Self::default()
            }
        }

        fn with_challenge(kind: ChallengeKind, final_reply: LoginReply) -> Self {
            Self {
                login_replies: Mutex::new(VecDeque::from([
                    LoginReply::Verification(VerificationWorkflowId::new("vw-1")),
                    final_reply,
                ])),
                machine_id: Some(MachineId::new("m-1")),
                challenge: Some(Challenge::new(ChallengeId::new("c1"), kind)),
                valid_code: "123456".to_string(),
                push_status: Mutex::new("issued".to_string()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().push(call.into());
        }
    }

    #[async_trait]
    impl AuthGateway for FakeGateway {
        async fn login(
            &self,
            secret: &LoginSecret,
            device_id: &DeviceId,
            attempt: LoginAttempt,
        ) -> Result<LoginReply, AuthError> {
            self.record(format!("login:{attempt:?}:{}", secret.username()));
            if attempt == LoginAttempt::Finalize {
                self.finalize_devices.lock().push(device_id.clone());
            }
            self.login_replies
                .lock()
                .pop_front()
                .ok_or_else(|| AuthError::Transport("no scripted reply".into()))
        }

        async fn register_machine(
            &self,
            _device_id: &DeviceId,
            workflow: &VerificationWorkflowId,
        ) -> Result<Option<MachineId>, AuthError> {
            self.record(format!("register:{workflow}"));
            Ok(self.machine_id.clone())
        }

        async fn fetch_challenge(
            &self,
            machine_id: &MachineId,
        ) -> Result<Option<Challenge>, AuthError> {
            self.record(format!("inquire:{machine_id}"));
            Ok(self.challenge.clone())
        }

        async fn respond_to_challenge(
            &self,
            challenge_id: &ChallengeId,
            response: &str,
        ) -> Result<ChallengeStatus, AuthError> {
            self.record(format!("respond:{challenge_id}:{response}"));
            if response == self.valid_code {
                Ok(ChallengeStatus::Validated)
            } else {
                Ok(ChallengeStatus::NotValidated("failed".into()))
            }
        }

        async fn prompt_status(
            &self,
            challenge_id: &ChallengeId,
        ) -> Result<ChallengeStatus, AuthError> {
            self.record(format!("poll:{challenge_id}"));
            Ok(ChallengeStatus::from_wire(Some(
                self.push_status.lock().as_str(),
            )))
        }

        async fn acknowledge(&self, machine_id: &MachineId) -> Result<(), AuthError> {
            self.record(format!("ack:{machine_id}"));
            Ok(())
        }

        async fn refresh(
            &self,
            refresh_token: &str,
            device_id: &DeviceId,
        ) -> Result<LoginReply, AuthError> {
            self.record(format!("refresh:{refresh_token}:{device_id}"));
            self.refresh_reply
                .clone()
                .ok_or_else(|| AuthError::Transport("no scripted reply".into()))
        }
    }

    struct FixedDeviceIds;

    impl DeviceIdSource for FixedDeviceIds {
        fn next_device_id(&self) -> DeviceId {
            DeviceId::new("generated-device")
        }
    }

    fn authenticator(
        gateway: FakeGateway,
    ) -> (
        Authenticator<FakeGateway, InMemoryWorkflowStore>,
        Arc<FakeGateway>,
        Arc<InMemoryWorkflowStore>,
    ) {
        let gateway = Arc::new(gateway);
        let store = Arc::new(InMemoryWorkflowStore::default());
        let auth = Authenticator::with_device_ids(
            Arc::clone(&gateway),
            Arc::clone(&store),
            Arc::new(FixedDeviceIds),
        );
        (auth, gateway, store)
    }

    fn pending(outcome: &HandshakeOutcome) -> PendingChallenge {
        outcome.pending().cloned().expect("expected awaiting_input")
    }

    #[tokio::test]
    async fn direct_token_leaves_store_empty() {
        let (auth, gateway, store) = authenticator(FakeGateway::token("abc"));

        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();

        assert_eq!(outcome.credential().unwrap().access_token(), "abc");
        assert!(store.is_empty());
        assert_eq!(gateway.calls(), vec!["login:Initial:user"]);
    }

    #[tokio::test]
    async fn blank_credentials_fail_before_any_request() {
        let (auth, gateway, _) = authenticator(FakeGateway::token("abc"));

        let err = auth.start_handshake("", "pass", None).await.unwrap_err();

        assert!(matches!(err, AuthError::MissingCredentials(_)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_login_is_failed_outcome() {
        let gateway = FakeGateway {
            login_replies: Mutex::new(VecDeque::from([LoginReply::Rejected {
                detail: "Unable to log in with provided credentials.".into(),
            }])),
            ..FakeGateway::default()
        };
        let (auth, _, store) = authenticator(gateway);

        let outcome = auth.start_handshake("user", "bad", None).await.unwrap();

        assert_eq!(
            outcome,
            HandshakeOutcome::Failed {
                message: "Unable to log in with provided credentials.".into()
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn sms_challenge_round_trip() {
        let (auth, gateway, store) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        ));

        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let pending = pending(&outcome);
        assert_eq!(pending.auth_type, AuthType::Mfa);
        assert_eq!(pending.message, "Enter the SMS code:");
        assert_eq!(store.len(), 1);

        let outcome = auth
            .resolve_challenge(&pending.workflow_id, Some("123456"))
            .await
            .unwrap();

        assert_eq!(outcome.credential().unwrap().access_token(), "xyz");
        assert!(store.is_empty());
        assert_eq!(
            gateway.calls(),
            vec![
                "login:Initial:user",
                "register:vw-1",
                "inquire:m-1",
                "respond:c1:123456",
                "ack:m-1",
                "login:Finalize:user",
            ]
        );
        assert_eq!(
            gateway.finalize_devices.lock().clone(),
            vec![DeviceId::new("generated-device")]
        );
    }

    #[tokio::test]
    async fn rejected_code_keeps_workflow_for_retry() {
        let (auth, _, store) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let workflow_id = pending(&outcome).workflow_id;

        let err = auth
            .resolve_challenge(&workflow_id, Some("000000"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ChallengeRejected { .. }));
        assert_eq!(store.len(), 1);

        let outcome = auth
            .resolve_challenge(&workflow_id, Some("123456"))
            .await
            .unwrap();
        assert_eq!(outcome.status(), "success");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn push_challenge_polls_once() {
        let (auth, gateway, store) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Push,
            LoginReply::Token(Credential::new("xyz")),
        ));
        let outcome = auth
            .start_handshake("user", "pass", Some(DeviceId::new("my-device")))
            .await
            .unwrap();
        let pending = pending(&outcome);
        assert_eq!(pending.auth_type, AuthType::DeviceConfirmation);

        let err = auth
            .resolve_challenge(&pending.workflow_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ChallengeRejected { ref status, .. } if status == "issued"));
        assert_eq!(store.len(), 1);

        *gateway.push_status.lock() = "validated".to_string();
        let outcome = auth
            .resolve_challenge(&pending.workflow_id, None)
            .await
            .unwrap();
        assert_eq!(outcome.credential().unwrap().access_token(), "xyz");
        assert_eq!(
            gateway.calls().iter().filter(|c| c.starts_with("poll:")).count(),
            2
        );
        assert_eq!(
            gateway.finalize_devices.lock().clone(),
            vec![DeviceId::new("my-device")]
        );
    }

    #[tokio::test]
    async fn unknown_challenge_kind_is_classified_unknown() {
        let (auth, _, _) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Other("email".into()),
            LoginReply::Token(Credential::new("xyz")),
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        assert_eq!(pending(&outcome).auth_type, AuthType::Unknown);
    }

    #[tokio::test]
    async fn missing_machine_id_fails_discovery_without_state() {
        let mut gateway = FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        );
        gateway.machine_id = None;
        let (auth, _, store) = authenticator(gateway);

        let err = auth.start_handshake("user", "pass", None).await.unwrap_err();

        assert!(matches!(err, AuthError::ChallengeDiscoveryFailed { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_challenge_fails_discovery_without_state() {
        let mut gateway = FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        );
        gateway.challenge = None;
        let (auth, _, store) = authenticator(gateway);

        let err = auth.start_handshake("user", "pass", None).await.unwrap_err();

        assert!(matches!(err, AuthError::ChallengeDiscoveryFailed { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unknown_workflow_is_idempotent() {
        let (auth, gateway, _) = authenticator(FakeGateway::token("abc"));
        let missing = WorkflowId::new("nope");

        for _ in 0..2 {
            let err = auth
                .resolve_challenge(&missing, Some("123456"))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                AuthError::UnknownWorkflow {
                    workflow_id: missing.clone()
                }
            );
        }
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn finalized_workflow_cannot_be_resolved_again() {
        let (auth, _, _) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let workflow_id = pending(&outcome).workflow_id;
        auth.resolve_challenge(&workflow_id, Some("123456"))
            .await
            .unwrap();

        let err = auth
            .resolve_challenge(&workflow_id, Some("123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownWorkflow { .. }));
    }

    #[tokio::test]
    async fn token_issuance_failure_still_deletes_state() {
        let (auth, _, store) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Rejected {
                detail: "invalid grant".into(),
            },
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let workflow_id = pending(&outcome).workflow_id;

        let err = auth
            .resolve_challenge(&workflow_id, Some("123456"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AuthError::TokenIssuanceFailed {
                detail: "invalid grant".into()
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_final_token_is_issuance_failure() {
        let (auth, _, _) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("")),
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let workflow_id = pending(&outcome).workflow_id;

        let err = auth
            .resolve_challenge(&workflow_id, Some("123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenIssuanceFailed { .. }));
    }

    #[tokio::test]
    async fn sign_in_with_token_skips_handshake() {
        let (auth, gateway, _) = authenticator(FakeGateway::default());

        let outcome = auth
            .sign_in(SignInRequest::Token {
                access_token: "stored".into(),
                refresh_token: Some("r".into()),
                device_id: Some(DeviceId::new("d")),
            })
            .await
            .unwrap();

        let credential = outcome.credential().unwrap();
        assert_eq!(credential.access_token(), "stored");
        assert_eq!(credential.refresh_token(), Some("r"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn sign_in_with_empty_token_fails() {
        let (auth, _, _) = authenticator(FakeGateway::default());
        let err = auth.sign_in(SignInRequest::token("  ")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn sign_in_with_password_runs_handshake() {
        let (auth, _, _) = authenticator(FakeGateway::token("abc"));
        let outcome = auth
            .sign_in(SignInRequest::password("user", "pass"))
            .await
            .unwrap();
        assert_eq!(outcome.credential().unwrap().access_token(), "abc");
    }

    #[tokio::test]
    async fn refresh_requires_refresh_token_and_device() {
        let (auth, _, _) = authenticator(FakeGateway::default());

        let err = auth.refresh(&Credential::new("a")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials(_)));

        let err = auth
            .refresh(&Credential::new("a").with_refresh_token("r"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn refresh_returns_new_credential() {
        let gateway = FakeGateway {
            refresh_reply: Some(LoginReply::Token(
                Credential::new("fresh").with_device_id(DeviceId::new("d")),
            )),
            ..FakeGateway::default()
        };
        let (auth, gateway, _) = authenticator(gateway);
        let old = Credential::new("stale")
            .with_refresh_token("r1")
            .with_device_id(DeviceId::new("d"));

        let fresh = auth.refresh(&old).await.unwrap();

        assert_eq!(fresh.access_token(), "fresh");
        assert_eq!(gateway.calls(), vec!["refresh:r1:d"]);
    }

    #[tokio::test]
    async fn abandon_removes_workflow() {
        let (auth, _, store) = authenticator(FakeGateway::with_challenge(
            ChallengeKind::Sms,
            LoginReply::Token(Credential::new("xyz")),
        ));
        let outcome = auth.start_handshake("user", "pass", None).await.unwrap();
        let workflow_id = pending(&outcome).workflow_id;

        assert!(auth.abandon(&workflow_id));
        assert!(!auth.abandon(&workflow_id));
        assert!(store.is_empty());
    }
}
