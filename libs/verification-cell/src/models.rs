// libs/verification-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// States of one email-possession proof attempt. Expiry and email edits
/// return the session to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    Idle,
    CodeSent,
    Verified,
}

/// In-progress proof of email possession. Ephemeral: lives in process
/// memory only and is never written to the store.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    pub email: String,
    pub code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub state: VerificationState,
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Verification code could not be delivered: {0}")]
    Dispatch(String),

    #[error("Verification code has expired")]
    CodeExpired,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("No verification code is pending for this session")]
    NoActiveSession,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct RequestCodeBody {
    pub session_id: Option<Uuid>,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCodeBody {
    pub session_id: Uuid,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetBody {
    pub session_id: Uuid,
    pub email: String,
}
