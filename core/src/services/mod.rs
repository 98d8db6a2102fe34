//! Business services

pub mod auth;

pub use auth::*;
