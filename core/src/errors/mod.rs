//! Error types for the authentication flow.

mod types;

pub use types::ProviderError;

use thiserror::Error;

/// Errors surfaced by the authentication flow
///
/// Every variant is recoverable from the user's perspective: a failure
/// never destroys the verification session, only a successful sign-in or
/// explicit abandonment ends its lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFlowError {
    /// Phone number failed local validation; the payload is pre-masked
    #[error("Malformed phone number: {phone}")]
    MalformedPhoneNumber { phone: String },

    /// Verify or resend attempted without a valid prior send
    #[error("No active verification session")]
    NoActiveSession,

    /// A provider request is already pending for this session
    #[error("A verification request is already in flight")]
    RequestInFlight,

    /// Wrong one-time passcode; the user may retry
    #[error("Invalid verification code")]
    InvalidCode,

    /// No provider response within the request bound
    #[error("Verification request timed out")]
    VerificationTimeout,

    /// Transport-level failure reported by the provider
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Any other provider-reported failure
    #[error("Verification failed: {message}")]
    Other { message: String },
}

impl AuthFlowError {
    /// Stable error code for programmatic handling in the UI layer
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthFlowError::MalformedPhoneNumber { .. } => "MALFORMED_PHONE_NUMBER",
            AuthFlowError::NoActiveSession => "NO_ACTIVE_SESSION",
            AuthFlowError::RequestInFlight => "REQUEST_IN_FLIGHT",
            AuthFlowError::InvalidCode => "INVALID_CODE",
            AuthFlowError::VerificationTimeout => "VERIFICATION_TIMEOUT",
            AuthFlowError::NetworkError { .. } => "NETWORK_ERROR",
            AuthFlowError::Other { .. } => "OTHER",
        }
    }

    /// User-facing message for toasts and inline error text
    pub fn user_message(&self) -> String {
        match self {
            AuthFlowError::MalformedPhoneNumber { .. } => {
                "Enter a valid phone number".to_string()
            }
            AuthFlowError::NoActiveSession => "Request a new code first".to_string(),
            AuthFlowError::RequestInFlight => "A request is already in progress".to_string(),
            AuthFlowError::InvalidCode => "Invalid code".to_string(),
            AuthFlowError::VerificationTimeout => {
                "Verification timed out. Please try again".to_string()
            }
            AuthFlowError::NetworkError { .. } => {
                "Network error. Check your connection and try again".to_string()
            }
            AuthFlowError::Other { message } => format!("Verification failed: {}", message),
        }
    }
}

pub type AuthFlowResult<T> = Result<T, AuthFlowError>;
