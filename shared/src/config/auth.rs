//! Authentication flow configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the phone/OTP authentication flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthFlowConfig {
    /// Maximum time a send or sign-in request may remain pending, in seconds
    pub request_timeout_seconds: u64,

    /// Number of digits in a one-time passcode
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl Default for AuthFlowConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 60, // provider bound per attempt
            code_length: default_code_length(),
        }
    }
}

impl AuthFlowConfig {
    /// Set the provider request timeout in seconds
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Set the expected passcode length
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// The provider request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_code_length() -> usize {
    6
}
