// libs/patient-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One de-duplicated patient identity. Created on first unmatched lookup,
/// never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// How a submitted (email, name) pair is matched against stored patients.
///
/// The clinic's policy treats identity as email and name jointly: the same
/// email with a different name is a different person sharing an inbox. A
/// legitimate name change therefore spawns a fresh identity, which is why
/// the policy is pluggable rather than hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityPolicy {
    #[default]
    EmailAndName,
    EmailOnly,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Storage error: {0}")]
    Storage(String),
}
