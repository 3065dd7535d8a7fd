// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use doctor_cell::models::DoctorDirectory;
use doctor_cell::services::schedule::generate_slots;
use shared_config::AppConfig;
use shared_models::error::AppError;
use verification_cell::services::verifier::SessionStore;

use crate::models::{AvailabilityQuery, BookingError, BookingRequest, SlotAvailability};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingCoordinator;
use crate::services::consistency::SlotGuard;
use crate::services::dashboard::DashboardService;

pub struct BookingContext {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub slots: SlotGuard,
}

/// The slot picker's data: every generated slot for the doctor-day with its
/// advisory booked flag.
#[axum::debug_handler]
pub async fn get_availability(
    State(ctx): State<Arc<BookingContext>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectory::default();
    let schedule = directory
        .find(&query.doctor)
        .ok_or_else(|| AppError::NotFound(format!("Unknown doctor: {}", query.doctor)))?;

    let availability_service = AvailabilityService::new(&ctx.config);
    let booked = availability_service
        .fetch_booked(&query.doctor, query.date)
        .await;

    let slots: Vec<SlotAvailability> = generate_slots(schedule)
        .into_iter()
        .map(|slot| SlotAvailability {
            booked: booked.contains(&slot.label),
            time: slot.label,
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "doctor": query.doctor,
        "date": query.date,
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn submit_booking(
    State(ctx): State<Arc<BookingContext>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let coordinator =
        BookingCoordinator::new(&ctx.config, ctx.sessions.clone(), ctx.slots.clone());

    let outcome = coordinator.submit_booking(request).await.map_err(|e| match e {
        BookingError::Validation(msg) => AppError::BadRequest(msg),
        BookingError::NotVerified => {
            AppError::Forbidden("Please verify your email before booking".to_string())
        }
        BookingError::SlotAlreadyTaken => AppError::Conflict(
            "This time slot is already booked. Please choose another.".to_string(),
        ),
        BookingError::Storage(msg) => AppError::Database(msg),
    })?;

    let message = if outcome.confirmation_sent {
        format!(
            "Appointment booked successfully! ID: {} (Patient: {})",
            outcome.appointment_id, outcome.patient_id
        )
    } else {
        format!(
            "Appointment booked (ID: {}), but the confirmation email could not be sent.",
            outcome.appointment_id
        )
    };

    Ok(Json(json!({
        "success": true,
        "appointment_id": outcome.appointment_id,
        "patient_id": outcome.patient_id,
        "confirmation_sent": outcome.confirmation_sent,
        "message": message
    })))
}

/// Admin dashboard listing: all appointments in creation order.
#[axum::debug_handler]
pub async fn list_appointments(
    State(ctx): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let dashboard = DashboardService::new(&ctx.config);

    let appointments = dashboard
        .list_appointments()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}
