//! Verification session entity for phone/OTP authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::SessionSnapshot;
use crate::errors::{AuthFlowError, AuthFlowResult};

/// States of a verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, no provider request issued yet
    Idle,
    /// A code-send request is pending with the provider
    CodeRequested,
    /// A code was delivered; waiting for user entry
    CodeSent,
    /// A sign-in request is pending with the provider
    Verifying,
    /// Sign-in succeeded
    Authenticated,
    /// The last provider request failed
    Failed,
}

/// A single phone verification attempt
///
/// Created when the user submits a phone number and destroyed on
/// successful sign-in or explicit abandonment. The session is exclusively
/// owned by the `SessionController`; the UI layer only ever sees
/// `SessionSnapshot` values.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationSession {
    /// Unique identifier for this attempt
    pub id: Uuid,

    /// Phone number in E.164 format, set once per attempt
    pub phone: String,

    /// Opaque token identifying the most recent successful send;
    /// required to redeem a code
    pub verification_id: Option<String>,

    /// Opaque token allowing a duplicate send without a new distinct
    /// verification attempt on the provider side
    pub resend_token: Option<String>,

    /// Current state of the attempt
    pub state: SessionState,

    /// Failure recorded by the most recent rejected or failed request
    pub last_error: Option<AuthFlowError>,

    /// When the pending provider request was issued
    pub requested_at: Option<DateTime<Utc>>,

    /// Bound on how long a provider request may remain pending
    pub timeout_seconds: u64,

    /// When the attempt was created
    pub created_at: DateTime<Utc>,
}

impl VerificationSession {
    /// Create a new idle session for a phone number
    pub fn new(phone: String, timeout_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            verification_id: None,
            resend_token: None,
            state: SessionState::Idle,
            last_error: None,
            requested_at: None,
            timeout_seconds,
            created_at: Utc::now(),
        }
    }

    /// Transition into `CodeRequested` ahead of a send or resend
    ///
    /// Rejected while another provider request is pending: requests are
    /// never queued, callers must wait for the pending one to settle.
    pub fn begin_send(&mut self) -> AuthFlowResult<()> {
        if self.is_request_pending() {
            return Err(AuthFlowError::RequestInFlight);
        }
        if self.state == SessionState::Authenticated {
            return Err(AuthFlowError::NoActiveSession);
        }
        self.state = SessionState::CodeRequested;
        self.requested_at = Some(Utc::now());
        Ok(())
    }

    /// Record a successful send
    ///
    /// Both tokens are replaced, never merged: a stale `verification_id`
    /// must not be redeemable once a newer one has been issued.
    pub fn complete_send(&mut self, verification_id: String, resend_token: String) {
        self.verification_id = Some(verification_id);
        self.resend_token = Some(resend_token);
        self.state = SessionState::CodeSent;
        self.last_error = None;
    }

    /// Transition into `Verifying` ahead of a code submission
    ///
    /// Requires a `verification_id` from a prior send, and a settled
    /// state: a submission while another request is pending is rejected,
    /// not queued.
    pub fn begin_verify(&mut self) -> AuthFlowResult<()> {
        if self.verification_id.is_none() {
            return Err(AuthFlowError::NoActiveSession);
        }
        match self.state {
            SessionState::CodeSent | SessionState::Failed => {
                self.state = SessionState::Verifying;
                self.requested_at = Some(Utc::now());
                Ok(())
            }
            SessionState::CodeRequested | SessionState::Verifying => {
                Err(AuthFlowError::RequestInFlight)
            }
            SessionState::Idle | SessionState::Authenticated => {
                Err(AuthFlowError::NoActiveSession)
            }
        }
    }

    /// Transition `CodeRequested` straight into `Verifying` when the
    /// provider resolves a credential without explicit code entry
    pub fn begin_instant_verify(&mut self) {
        self.state = SessionState::Verifying;
        self.requested_at = Some(Utc::now());
    }

    /// Record a successful sign-in
    pub fn complete_authentication(&mut self) {
        self.state = SessionState::Authenticated;
        self.last_error = None;
    }

    /// Record a rejected code: back to `CodeSent` so the user may retry
    /// against the same send attempt, tokens untouched
    pub fn reject_code(&mut self) {
        self.state = SessionState::CodeSent;
        self.last_error = Some(AuthFlowError::InvalidCode);
    }

    /// Record a failed provider request
    pub fn fail(&mut self, reason: AuthFlowError) {
        self.state = SessionState::Failed;
        self.last_error = Some(reason);
    }

    /// Whether a provider request is currently pending
    pub fn is_request_pending(&self) -> bool {
        matches!(
            self.state,
            SessionState::CodeRequested | SessionState::Verifying
        )
    }

    /// Whether a resend may be issued right now
    pub fn can_resend(&self) -> bool {
        self.resend_token.is_some() && !self.is_request_pending()
    }

    /// Render the read model handed to the UI layer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            phone: self.phone.clone(),
            state: self.state,
            error_code: self.last_error.as_ref().map(|e| e.error_code().to_string()),
            error_message: self.last_error.as_ref().map(|e| e.user_message()),
            can_resend: self.can_resend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> VerificationSession {
        VerificationSession::new("+15551234567".to_string(), 60)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session();
        assert_eq!(session.state, SessionState::Idle);
        assert_eq!(session.phone, "+15551234567");
        assert!(session.verification_id.is_none());
        assert!(session.resend_token.is_none());
        assert!(session.last_error.is_none());
        assert!(session.requested_at.is_none());
        assert!(!session.is_request_pending());
        assert!(!session.can_resend());
    }

    #[test]
    fn test_begin_send_enters_code_requested() {
        let mut session = session();
        session.begin_send().unwrap();
        assert_eq!(session.state, SessionState::CodeRequested);
        assert!(session.requested_at.is_some());
        assert!(session.is_request_pending());
    }

    #[test]
    fn test_begin_send_rejected_while_pending() {
        let mut session = session();
        session.begin_send().unwrap();
        assert_eq!(session.begin_send(), Err(AuthFlowError::RequestInFlight));

        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();
        assert_eq!(session.begin_send(), Err(AuthFlowError::RequestInFlight));
    }

    #[test]
    fn test_complete_send_stores_both_tokens() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());

        assert_eq!(session.state, SessionState::CodeSent);
        assert_eq!(session.verification_id.as_deref(), Some("vid-1"));
        assert_eq!(session.resend_token.as_deref(), Some("tok-1"));
        assert!(session.can_resend());
    }

    #[test]
    fn test_resend_token_absent_until_first_code_sent() {
        let mut session = session();
        assert!(session.resend_token.is_none());
        session.begin_send().unwrap();
        // Still pending: no code has been sent yet
        assert!(session.resend_token.is_none());
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        assert!(session.resend_token.is_some());
    }

    #[test]
    fn test_complete_send_replaces_tokens() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());

        // A resend issues fresh tokens; the stale pair is gone entirely
        session.begin_send().unwrap();
        session.complete_send("vid-2".to_string(), "tok-2".to_string());
        assert_eq!(session.verification_id.as_deref(), Some("vid-2"));
        assert_eq!(session.resend_token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_begin_verify_requires_verification_id() {
        let mut session = session();
        assert_eq!(session.begin_verify(), Err(AuthFlowError::NoActiveSession));

        session.begin_send().unwrap();
        // Pending send, still no id
        assert_eq!(session.begin_verify(), Err(AuthFlowError::NoActiveSession));
    }

    #[test]
    fn test_begin_verify_from_code_sent() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());

        session.begin_verify().unwrap();
        assert_eq!(session.state, SessionState::Verifying);
        assert!(session.is_request_pending());
    }

    #[test]
    fn test_begin_verify_rejected_while_verifying() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();

        assert_eq!(session.begin_verify(), Err(AuthFlowError::RequestInFlight));
    }

    #[test]
    fn test_begin_verify_allowed_from_failed() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();
        session.fail(AuthFlowError::VerificationTimeout);

        // The id from the earlier send is still redeemable after a failure
        session.begin_verify().unwrap();
        assert_eq!(session.state, SessionState::Verifying);
    }

    #[test]
    fn test_reject_code_returns_to_code_sent() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();

        session.reject_code();
        assert_eq!(session.state, SessionState::CodeSent);
        assert_eq!(session.last_error, Some(AuthFlowError::InvalidCode));
        // Retry is possible against the same send attempt
        assert_eq!(session.verification_id.as_deref(), Some("vid-1"));
        assert_eq!(session.resend_token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_fail_records_reason() {
        let mut session = session();
        session.begin_send().unwrap();
        session.fail(AuthFlowError::NetworkError {
            message: "unreachable".to_string(),
        });

        assert_eq!(session.state, SessionState::Failed);
        assert!(matches!(
            session.last_error,
            Some(AuthFlowError::NetworkError { .. })
        ));
        assert!(!session.is_request_pending());
    }

    #[test]
    fn test_complete_authentication_clears_error() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();
        session.reject_code();
        session.begin_verify().unwrap();

        session.complete_authentication();
        assert_eq!(session.state, SessionState::Authenticated);
        assert!(session.last_error.is_none());
    }

    #[test]
    fn test_begin_send_after_authentication_rejected() {
        let mut session = session();
        session.begin_send().unwrap();
        session.complete_send("vid-1".to_string(), "tok-1".to_string());
        session.begin_verify().unwrap();
        session.complete_authentication();

        assert_eq!(session.begin_send(), Err(AuthFlowError::NoActiveSession));
    }

    #[test]
    fn test_instant_verify_skips_code_entry() {
        let mut session = session();
        session.begin_send().unwrap();
        session.begin_instant_verify();

        assert_eq!(session.state, SessionState::Verifying);
        // No code was ever sent, so no resend credential exists
        assert!(session.resend_token.is_none());
    }

    #[test]
    fn test_snapshot_reflects_failure() {
        let mut session = session();
        session.begin_send().unwrap();
        session.fail(AuthFlowError::VerificationTimeout);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.id);
        assert_eq!(snapshot.state, SessionState::Failed);
        assert_eq!(snapshot.error_code.as_deref(), Some("VERIFICATION_TIMEOUT"));
        assert!(snapshot.error_message.is_some());
        assert!(!snapshot.can_resend);
    }
}
