//! # ChatLink Auth Core
//!
//! Verification session state machine and controller for the ChatLink
//! client's phone/OTP authentication flow. This crate contains the domain
//! entities, the session controller, the contracts consumed from the
//! identity provider and navigation collaborators, and the error types
//! shared across the flow.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
