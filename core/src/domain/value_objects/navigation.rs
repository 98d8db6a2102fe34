//! Screen-transition intents

use serde::{Deserialize, Serialize};

/// Intents emitted to the navigation bridge when an operation settles
///
/// The flow core only ever emits intents; it never manipulates navigation
/// history itself. An intent is dispatched every time a provider request
/// settles, independently of whether the request succeeded: the session
/// state carries the actual outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationIntent {
    /// Move to the code-entry screen
    NavigateToCodeEntry,
    /// Move to the main screen after a successful sign-in
    NavigateToMain,
    /// Remain on the current screen and surface an error message
    StayWithError { message: String },
}
