//! Traits for identity provider and navigation integration

use async_trait::async_trait;

use crate::domain::value_objects::NavigationIntent;
use crate::errors::ProviderError;

use super::types::{SendCodeRequest, SendOutcome};

/// Contract consumed from the external identity provider
///
/// The flow core relies on these operations only; code delivery and
/// credential validation mechanics stay behind this seam.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider-specific proof object built from a verification id and an
    /// entered code, exchanged for an authenticated session
    type Credential: Send;

    /// Request a verification code to be delivered to a phone number
    async fn send_verification_code(
        &self,
        request: SendCodeRequest,
    ) -> Result<SendOutcome<Self::Credential>, ProviderError>;

    /// Build a credential from a verification id and an entered code
    fn build_credential(&self, verification_id: &str, code: &str) -> Self::Credential;

    /// Exchange a credential for an authenticated session
    async fn sign_in(&self, credential: Self::Credential) -> Result<(), ProviderError>;
}

/// Receives screen-transition intents from the flow core
pub trait NavigationBridge: Send + Sync {
    /// Handle a screen-transition intent
    fn dispatch(&self, intent: NavigationIntent);
}
