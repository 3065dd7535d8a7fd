// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// One booked consultation as written to the `appointments` collection.
///
/// Invariant: no two non-cancelled appointments share the same
/// `(doctor, date, time)` triple. Creation goes through the booking
/// coordinator only; status transitions afterwards are an administrative
/// action outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
    pub message: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Booked => write!(f, "booked"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// The booking form's submitted payload. The session id ties the submission
/// back to the email-verification session that gates it.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub session_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingOutcome {
    pub appointment_id: String,
    pub patient_id: String,
    /// False when the appointment persisted but the confirmation email
    /// could not be delivered (degraded success, not a failure).
    pub confirmation_sent: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor: String,
    pub date: NaiveDate,
}

/// One entry of the slot picker: the display label plus the advisory
/// booked flag.
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    pub time: String,
    pub booked: bool,
}

/// Dashboard projection of one appointment, with display fallbacks already
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    pub appointment_id: String,
    pub full_name: String,
    pub doctor: String,
    pub date: String,
    pub time: String,
    pub phone: String,
    pub message: String,
    pub status: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email address has not been verified for this booking")]
    NotVerified,

    #[error("This time slot is already booked")]
    SlotAlreadyTaken,

    #[error("Storage error: {0}")]
    Storage(String),
}
