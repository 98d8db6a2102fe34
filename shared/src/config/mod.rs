//! Configuration module for the authentication flow
//!
//! Configuration is kept separate from the domain layer so a future UI or
//! FFI member can construct and serialize it without pulling in `cl_core`.

pub mod auth;

pub use auth::AuthFlowConfig;
