//! Provider-facing error types
//!
//! The identity provider reports failures through `ProviderError`; the
//! flow classifies them into `AuthFlowError` variants when a completion
//! settles. User-facing messages live on `AuthFlowError`.

use thiserror::Error;

use super::AuthFlowError;

/// Errors reported by the identity provider collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Network failure: {message}")]
    Network { message: String },

    #[error("Provider failure: {message}")]
    Other { message: String },
}

/// Classify a settled provider failure into the flow taxonomy
impl From<ProviderError> for AuthFlowError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidCredentials => AuthFlowError::InvalidCode,
            ProviderError::Network { message } => AuthFlowError::NetworkError { message },
            ProviderError::Other { message } => AuthFlowError::Other { message },
        }
    }
}
