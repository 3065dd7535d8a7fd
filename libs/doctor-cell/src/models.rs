// libs/doctor-cell/src/models.rs
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// How the end of a doctor's working window is treated when generating
/// slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The last slot starts strictly before the end of the window.
    Exclusive,
    /// A slot may start exactly at the end of the window.
    Inclusive,
}

/// Per-doctor scheduling configuration: fixed daily working window and slot
/// granularity. These are configuration values, not constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub name: String,
    pub specialty: String,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub slot_minutes: u32,
    pub boundary: BoundaryPolicy,
}

/// The clinic's fixed set of bookable doctors, keyed by display name.
#[derive(Debug, Clone)]
pub struct DoctorDirectory {
    doctors: Vec<DoctorSchedule>,
}

impl DoctorDirectory {
    pub fn with_roster(doctors: Vec<DoctorSchedule>) -> Self {
        Self { doctors }
    }

    pub fn find(&self, name: &str) -> Option<&DoctorSchedule> {
        self.doctors.iter().find(|d| d.name == name)
    }

    pub fn all(&self) -> &[DoctorSchedule] {
        &self.doctors
    }
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::with_roster(vec![
            DoctorSchedule {
                name: "Dr. Sujith M S".to_string(),
                specialty: "Physician".to_string(),
                day_start: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                day_end: NaiveTime::from_hms_opt(23, 45, 0).unwrap(),
                slot_minutes: 15,
                boundary: BoundaryPolicy::Inclusive,
            },
            DoctorSchedule {
                name: "Dr. Ashwini B S".to_string(),
                specialty: "Pediatrician".to_string(),
                day_start: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                slot_minutes: 15,
                boundary: BoundaryPolicy::Inclusive,
            },
        ])
    }
}

/// One bookable time-of-day value together with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub label: String,
}

/// Roster entry served to the booking form's doctor picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub name: String,
    pub specialty: String,
    pub day_start: String,
    pub day_end: String,
    pub slot_minutes: u32,
}
