// libs/doctor-cell/src/handlers.rs
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{DoctorDirectory, DoctorInfo};
use crate::services::schedule::slot_label;

/// Roster for the booking form's doctor picker: display name, specialty and
/// the working window the slot picker will be generated from.
pub async fn list_doctors() -> Json<Value> {
    debug!("Listing doctor roster");

    let directory = DoctorDirectory::default();
    let doctors: Vec<DoctorInfo> = directory
        .all()
        .iter()
        .map(|schedule| DoctorInfo {
            name: schedule.name.clone(),
            specialty: schedule.specialty.clone(),
            day_start: slot_label(schedule.day_start),
            day_end: slot_label(schedule.day_end),
            slot_minutes: schedule.slot_minutes,
        })
        .collect();

    Json(json!({
        "success": true,
        "doctors": doctors
    }))
}
