// libs/appointment-cell/src/services/booking.rs
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use doctor_cell::models::DoctorDirectory;
use doctor_cell::services::schedule::is_bookable_slot;
use patient_cell::services::resolver::PatientResolver;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_mailer::emailjs::MailerClient;
use verification_cell::services::verifier::SessionStore;

use crate::models::{Appointment, AppointmentStatus, BookingError, BookingOutcome, BookingRequest};
use crate::services::consistency::SlotGuard;

pub struct BookingCoordinator {
    store: StoreClient,
    resolver: PatientResolver,
    mailer: MailerClient,
    directory: DoctorDirectory,
    sessions: SessionStore,
    slots: SlotGuard,
    confirmation_template: String,
}

impl BookingCoordinator {
    pub fn new(config: &AppConfig, sessions: SessionStore, slots: SlotGuard) -> Self {
        Self {
            store: StoreClient::new(config),
            resolver: PatientResolver::new(config),
            mailer: MailerClient::new(config),
            directory: DoctorDirectory::default(),
            sessions,
            slots,
            confirmation_template: config.email_confirmation_template.clone(),
        }
    }

    /// Run one booking attempt end to end.
    ///
    /// Steps execute strictly in order: validate, gate on verification,
    /// authoritative slot re-check, patient resolution, display-id
    /// allocation, insert, best-effort confirmation. The confirmation is
    /// the only step whose failure does not fail the booking.
    pub async fn submit_booking(
        &self,
        request: BookingRequest,
    ) -> Result<BookingOutcome, BookingError> {
        validate_required_fields(&request)?;

        let schedule = self.directory.find(&request.doctor).ok_or_else(|| {
            BookingError::Validation(format!("Unknown doctor: {}", request.doctor))
        })?;

        if !is_bookable_slot(schedule, &request.time) {
            return Err(BookingError::Validation(format!(
                "{} is not a bookable time for {}",
                request.time, request.doctor
            )));
        }

        if !self.sessions.is_verified(request.session_id, &request.email).await {
            return Err(BookingError::NotVerified);
        }

        // One in-flight attempt per slot within this process; the loser of
        // a local race never reaches the store.
        let slot_key = SlotGuard::slot_key(&request.doctor, request.date, &request.time);
        let _permit = self
            .slots
            .try_acquire(&slot_key)
            .ok_or(BookingError::SlotAlreadyTaken)?;

        // Authoritative re-check against the store. The picker's advisory
        // set may be stale; this query decides.
        if self
            .slot_is_taken(&request.doctor, request.date, &request.time)
            .await?
        {
            warn!(
                "Slot {} on {} for {} taken between advisory check and submit",
                request.time, request.date, request.doctor
            );
            return Err(BookingError::SlotAlreadyTaken);
        }

        let patient_id = self
            .resolver
            .resolve(&request.email, &request.full_name, &request.phone)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        let appointment_id = self.next_appointment_id().await?;

        let appointment = Appointment {
            appointment_id: appointment_id.clone(),
            patient_id: patient_id.clone(),
            full_name: request.full_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            doctor: request.doctor.clone(),
            date: request.date,
            time: request.time.clone(),
            message: request.message.trim().to_string(),
            status: AppointmentStatus::Booked,
            created_at: Utc::now(),
        };

        let document = serde_json::to_value(&appointment)
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        self.store
            .insert("appointments", document)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        // A completed possession proof is single use.
        self.sessions.remove(request.session_id).await;

        let confirmation_sent = self.send_confirmation(&appointment).await;

        info!(
            "Appointment {} booked for patient {} with {}",
            appointment_id, patient_id, request.doctor
        );

        Ok(BookingOutcome {
            appointment_id,
            patient_id,
            confirmation_sent,
        })
    }

    async fn slot_is_taken(
        &self,
        doctor: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, BookingError> {
        debug!("Re-checking slot {} on {} for {}", time, date, doctor);

        let filters = format!(
            "doctor=eq.{}&date=eq.{}&time=eq.{}",
            urlencoding::encode(doctor),
            date,
            urlencoding::encode(time)
        );

        let records = self
            .store
            .query("appointments", &filters)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        Ok(records
            .iter()
            .any(|record| record["status"].as_str() != Some("cancelled")))
    }

    /// Next sequential display id from the current record count. Two
    /// concurrent bookings for different slots can still read the same
    /// count and mint colliding display ids; the underlying records stay
    /// distinct. Preserved as a documented limitation of the id scheme.
    async fn next_appointment_id(&self) -> Result<String, BookingError> {
        let all_appointments = self
            .store
            .query("appointments", "")
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        Ok(format!("SS{:02}", all_appointments.len() + 1))
    }

    async fn send_confirmation(&self, appointment: &Appointment) -> bool {
        let params = json!({
            "appointment_id": appointment.appointment_id,
            "patient_id": appointment.patient_id,
            "patient_name": appointment.full_name,
            "doctor_name": appointment.doctor,
            "appointment_date": appointment.date.to_string(),
            "appointment_time": appointment.time,
            "to_email": appointment.email,
        });

        match self
            .mailer
            .send_template(&self.confirmation_template, params)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Confirmation dispatch failed for {}: {}",
                    appointment.appointment_id, e
                );
                false
            }
        }
    }
}

fn validate_required_fields(request: &BookingRequest) -> Result<(), BookingError> {
    let required = [
        ("full_name", &request.full_name),
        ("phone", &request.phone),
        ("email", &request.email),
        ("doctor", &request.doctor),
        ("time", &request.time),
        ("message", &request.message),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(BookingError::Validation(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    Ok(())
}
