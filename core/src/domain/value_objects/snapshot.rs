//! Session read model for the UI layer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::SessionState;

/// Rendered view of a verification session
///
/// The UI reads snapshots and invokes controller operations; it never
/// holds or mutates the session itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier of the attempt this snapshot was rendered from
    pub session_id: Uuid,

    /// Phone number in E.164 format
    pub phone: String,

    /// Current state of the attempt
    pub state: SessionState,

    /// Stable code of the recorded failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// User-facing message of the recorded failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Whether a resend may be issued right now
    pub can_resend: bool,
}
