//! Authentication flow module
//!
//! This module drives the phone/OTP verification flow:
//! - Phone submission, code delivery, and resend with the stored credential
//! - Code verification and sign-in against the identity provider
//! - Screen-transition intents emitted on every settled request
//! - A single outstanding provider request per session, enforced by the
//!   state machine rather than queuing

mod controller;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use controller::SessionController;
pub use traits::{IdentityProvider, NavigationBridge};
pub use types::{SendCodeRequest, SendOutcome};
