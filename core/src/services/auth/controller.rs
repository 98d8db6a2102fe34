//! Session controller orchestrating the verification flow

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cl_shared::config::AuthFlowConfig;
use cl_shared::utils::phone::{compose_e164, mask_phone};
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::domain::entities::VerificationSession;
use crate::domain::value_objects::{NavigationIntent, SessionSnapshot};
use crate::errors::{AuthFlowError, AuthFlowResult, ProviderError};

use super::traits::{IdentityProvider, NavigationBridge};
use super::types::{SendCodeRequest, SendOutcome};

/// Controller owning the verification session for one login attempt
///
/// The three public operations are the only mutators of the session; the
/// UI reads `SessionSnapshot` values and never touches the session itself.
/// Conflicting concurrent operations are rejected by the state machine,
/// never queued, so at most one provider request is outstanding at any
/// time.
///
/// A pre-flight rejection (validation failure, missing session, busy
/// session) returns `Err` without contacting the provider. Once a provider
/// call settles, the operation returns `Ok` with a snapshot reflecting the
/// outcome, and a `NavigationIntent` is dispatched unconditionally: screen
/// flow and request success are separate signals.
pub struct SessionController<P, N>
where
    P: IdentityProvider,
    N: NavigationBridge,
{
    /// Identity provider collaborator
    provider: Arc<P>,
    /// Navigation bridge receiving screen-transition intents
    navigator: Arc<N>,
    /// Exclusively owned session; `None` until a phone number is submitted
    session: Mutex<Option<VerificationSession>>,
    /// Flow configuration
    config: AuthFlowConfig,
}

impl<P, N> SessionController<P, N>
where
    P: IdentityProvider,
    N: NavigationBridge,
{
    /// Create a new session controller
    ///
    /// # Arguments
    ///
    /// * `provider` - Identity provider implementation
    /// * `navigator` - Navigation bridge implementation
    /// * `config` - Flow configuration
    pub fn new(provider: Arc<P>, navigator: Arc<N>, config: AuthFlowConfig) -> Self {
        Self {
            provider,
            navigator,
            session: Mutex::new(None),
            config,
        }
    }

    /// Request a verification code for a phone number
    ///
    /// This method:
    /// 1. Validates and composes the phone number locally, failing with
    ///    `MalformedPhoneNumber` before any provider contact
    /// 2. Starts a fresh session for the attempt (rejected with
    ///    `RequestInFlight` while a request is already pending)
    /// 3. Issues the send request under the configured timeout
    /// 4. Settles: stores the issued tokens and moves to code entry,
    ///    signs in directly on an instant credential, or records the
    ///    failure - dispatching a navigation intent in every case
    pub async fn request_code(
        &self,
        country_code: &str,
        local_number: &str,
    ) -> AuthFlowResult<SessionSnapshot> {
        let phone = compose_e164(country_code, local_number).ok_or_else(|| {
            AuthFlowError::MalformedPhoneNumber {
                phone: mask_phone(&format!("+{}{}", country_code, local_number)),
            }
        })?;

        // Claim the request slot before any provider work
        {
            let mut guard = self.lock_session();
            if let Some(session) = guard.as_ref() {
                if session.is_request_pending() {
                    return Err(AuthFlowError::RequestInFlight);
                }
            }
            let mut session =
                VerificationSession::new(phone.clone(), self.config.request_timeout_seconds);
            session.begin_send()?;
            *guard = Some(session);
        }

        tracing::info!(
            phone = %mask_phone(&phone),
            event = "code_requested",
            "Requesting verification code"
        );

        let request = SendCodeRequest {
            phone,
            timeout_seconds: self.config.request_timeout_seconds,
            resend_token: None,
        };
        let outcome = timeout(
            self.config.request_timeout(),
            self.provider.send_verification_code(request),
        )
        .await;

        self.settle_send(outcome).await
    }

    /// Verify an entered one-time passcode
    ///
    /// Rejected synchronously, without a provider call, when the code is
    /// malformed (`InvalidCode`), no send has been completed
    /// (`NoActiveSession`), or another request is pending
    /// (`RequestInFlight`). Otherwise builds a credential from the stored
    /// verification id and the code, and signs in under the configured
    /// timeout. A wrong code settles back into `CodeSent` so the user may
    /// retry against the same send attempt.
    pub async fn verify_code(&self, code: &str) -> AuthFlowResult<SessionSnapshot> {
        if code.len() != self.config.code_length || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AuthFlowError::InvalidCode);
        }

        let verification_id = {
            let mut guard = self.lock_session();
            let session = guard.as_mut().ok_or(AuthFlowError::NoActiveSession)?;
            session.begin_verify()?;
            session
                .verification_id
                .clone()
                .ok_or(AuthFlowError::NoActiveSession)?
        };

        tracing::info!(event = "code_submitted", "Verifying entered code");

        let credential = self.provider.build_credential(&verification_id, code);
        self.perform_sign_in(credential, false).await
    }

    /// Re-issue the send request with the stored resend credential
    ///
    /// Fails with `NoActiveSession` when no resend token exists (no code
    /// has ever been sent for this session), without contacting the
    /// provider. The phone number is unchanged; on success both tokens are
    /// replaced by the freshly issued pair.
    pub async fn resend_code(&self) -> AuthFlowResult<SessionSnapshot> {
        let (phone, resend_token) = {
            let mut guard = self.lock_session();
            let session = guard.as_mut().ok_or(AuthFlowError::NoActiveSession)?;
            if session.is_request_pending() {
                return Err(AuthFlowError::RequestInFlight);
            }
            let token = session
                .resend_token
                .clone()
                .ok_or(AuthFlowError::NoActiveSession)?;
            session.begin_send()?;
            (session.phone.clone(), token)
        };

        tracing::info!(
            phone = %mask_phone(&phone),
            event = "code_resend_requested",
            "Re-requesting verification code"
        );

        let request = SendCodeRequest {
            phone,
            timeout_seconds: self.config.request_timeout_seconds,
            resend_token: Some(resend_token),
        };
        let outcome = timeout(
            self.config.request_timeout(),
            self.provider.send_verification_code(request),
        )
        .await;

        self.settle_send(outcome).await
    }

    /// Abandon the current attempt, destroying the session
    pub fn abandon(&self) {
        let mut guard = self.lock_session();
        if let Some(session) = guard.take() {
            tracing::info!(
                event = "session_abandoned",
                session_id = %session.id,
                "Verification session abandoned"
            );
        }
    }

    /// Rendered view of the current session, if one exists
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.lock_session().as_ref().map(|s| s.snapshot())
    }

    /// Apply a settled send request to the session
    async fn settle_send(
        &self,
        outcome: Result<Result<SendOutcome<P::Credential>, ProviderError>, Elapsed>,
    ) -> AuthFlowResult<SessionSnapshot> {
        match outcome {
            Ok(Ok(SendOutcome::CodeSent {
                verification_id,
                resend_token,
            })) => {
                let snapshot = self.with_session(|session| {
                    session.complete_send(verification_id, resend_token);
                    session.snapshot()
                })?;
                tracing::info!(
                    event = "code_sent",
                    session_id = %snapshot.session_id,
                    "Verification code sent"
                );
                self.navigator.dispatch(NavigationIntent::NavigateToCodeEntry);
                Ok(snapshot)
            }
            Ok(Ok(SendOutcome::InstantCredential(credential))) => {
                self.with_session(|session| session.begin_instant_verify())?;
                tracing::info!(
                    event = "instant_credential",
                    "Provider resolved credential without code entry"
                );
                self.perform_sign_in(credential, true).await
            }
            Ok(Err(error)) => self.settle_failure(error.into()),
            Err(_) => self.settle_failure(AuthFlowError::VerificationTimeout),
        }
    }

    /// Exchange a credential for an authenticated session and settle
    ///
    /// On the code-entry path a rejected credential returns the session to
    /// `CodeSent` for a retry; on the instant path there is no entered
    /// code to retry, so any rejection settles as a failure.
    async fn perform_sign_in(
        &self,
        credential: P::Credential,
        instant: bool,
    ) -> AuthFlowResult<SessionSnapshot> {
        let outcome = timeout(
            self.config.request_timeout(),
            self.provider.sign_in(credential),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                // Successful sign-in ends the session lifecycle
                let snapshot = self.take_session(|session| {
                    session.complete_authentication();
                    session.snapshot()
                })?;
                tracing::info!(
                    event = "authenticated",
                    session_id = %snapshot.session_id,
                    "Sign-in successful"
                );
                self.navigator.dispatch(NavigationIntent::NavigateToMain);
                Ok(snapshot)
            }
            Ok(Err(ProviderError::InvalidCredentials)) if !instant => {
                tracing::warn!(event = "code_rejected", "Provider rejected entered code");
                let snapshot = self.with_session(|session| {
                    session.reject_code();
                    session.snapshot()
                })?;
                self.navigator.dispatch(NavigationIntent::StayWithError {
                    message: AuthFlowError::InvalidCode.user_message(),
                });
                Ok(snapshot)
            }
            Ok(Err(error)) => self.settle_failure(error.into()),
            Err(_) => self.settle_failure(AuthFlowError::VerificationTimeout),
        }
    }

    /// Record a failed request and dispatch the settle signal
    ///
    /// The navigation intent is dispatched even though the request failed;
    /// the session state carries the actual outcome.
    fn settle_failure(&self, reason: AuthFlowError) -> AuthFlowResult<SessionSnapshot> {
        tracing::warn!(
            event = "request_failed",
            error_code = reason.error_code(),
            "Provider request failed"
        );
        let message = reason.user_message();
        let snapshot = self.with_session(|session| {
            session.fail(reason);
            session.snapshot()
        })?;
        self.navigator
            .dispatch(NavigationIntent::StayWithError { message });
        Ok(snapshot)
    }

    /// Run a closure against the current session
    fn with_session<T>(
        &self,
        f: impl FnOnce(&mut VerificationSession) -> T,
    ) -> AuthFlowResult<T> {
        let mut guard = self.lock_session();
        match guard.as_mut() {
            Some(session) => Ok(f(session)),
            None => Err(AuthFlowError::NoActiveSession),
        }
    }

    /// Run a closure against the current session, destroying it afterwards
    fn take_session<T>(
        &self,
        f: impl FnOnce(&mut VerificationSession) -> T,
    ) -> AuthFlowResult<T> {
        let mut guard = self.lock_session();
        match guard.take() {
            Some(mut session) => Ok(f(&mut session)),
            None => Err(AuthFlowError::NoActiveSession),
        }
    }

    /// Lock the session slot; never held across an await point
    fn lock_session(&self) -> MutexGuard<'_, Option<VerificationSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
