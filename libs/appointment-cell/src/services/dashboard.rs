// libs/appointment-cell/src/services/dashboard.rs
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::models::{AppointmentView, BookingError};

/// Read-only projection of the appointment collection for the
/// administrative dashboard. Performs no writes; polls the collection per
/// request.
pub struct DashboardService {
    store: StoreClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// All appointments in creation order, with display fallbacks applied
    /// for records predating the current field set.
    pub async fn list_appointments(&self) -> Result<Vec<AppointmentView>, BookingError> {
        let records = self
            .store
            .query("appointments", "order=created_at.asc")
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        debug!("Projecting {} appointments for dashboard", records.len());

        Ok(records
            .iter()
            .enumerate()
            .map(|(index, record)| view_from_record(index, record))
            .collect())
    }
}

/// Derive the dashboard row for one stored record. Records written before
/// the display-id scheme existed get a positional fallback id; missing
/// optional fields get their documented placeholders.
fn view_from_record(index: usize, record: &Value) -> AppointmentView {
    AppointmentView {
        appointment_id: match record["appointment_id"].as_str() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => format!("SS{:02}", index + 1),
        },
        full_name: text_or(record, "full_name", "N/A"),
        doctor: text_or(record, "doctor", "N/A"),
        date: normalize_date(record["date"].as_str()),
        time: text_or(record, "time", "N/A"),
        phone: text_or(record, "phone", "N/A"),
        message: text_or(record, "message", "—"),
        status: text_or(record, "status", "Booked"),
    }
}

fn text_or(record: &Value, field: &str, fallback: &str) -> String {
    match record[field].as_str() {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

/// Collapse the date representations that have accumulated in the
/// collection into one calendar-date text form.
fn normalize_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "N/A".to_string();
    };

    if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() {
        return raw.to_string();
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.date_naive().format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}
