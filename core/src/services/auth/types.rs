//! Types for identity provider requests and outcomes

/// Parameters of a code-send request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeRequest {
    /// Destination phone number in E.164 format
    pub phone: String,

    /// How long the provider may keep the request pending, in seconds
    pub timeout_seconds: u64,

    /// Resend credential from a previous send; suppresses the cost of a
    /// new distinct verification attempt on the provider side
    pub resend_token: Option<String>,
}

/// Outcome of a code-send request that settled successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome<C> {
    /// A code was dispatched to the phone
    CodeSent {
        /// Token identifying this send attempt, required to redeem a code
        verification_id: String,
        /// Token allowing a duplicate send of this attempt
        resend_token: String,
    },
    /// The provider resolved a credential without explicit code entry
    /// (e.g. auto-retrieval on the device)
    InstantCredential(C),
}
