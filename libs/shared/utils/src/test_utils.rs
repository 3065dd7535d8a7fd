use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub email_service_url: String,
    pub email_service_id: String,
    pub email_public_key: String,
    pub email_verification_template: String,
    pub email_confirmation_template: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
            email_service_url: "http://localhost:54322".to_string(),
            email_service_id: "service_test".to_string(),
            email_public_key: "test-public-key".to_string(),
            email_verification_template: "template_verify".to_string(),
            email_confirmation_template: "template_confirm".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the store and mail clients at mock servers.
    pub fn with_mock_endpoints(store_url: &str, email_service_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            email_service_url: email_service_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            email_service_url: self.email_service_url.clone(),
            email_service_id: self.email_service_id.clone(),
            email_public_key: self.email_public_key.clone(),
            email_verification_template: self.email_verification_template.clone(),
            email_confirmation_template: self.email_confirmation_template.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn appointment_response(
        appointment_id: &str,
        patient_id: &str,
        doctor: &str,
        date: &str,
        time: &str,
    ) -> serde_json::Value {
        json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "full_name": "Test Patient",
            "phone": "+91 9900000000",
            "email": "patient@example.com",
            "doctor": doctor,
            "date": date,
            "time": time,
            "message": "Routine check-up",
            "status": "booked",
            "created_at": "2025-11-01T10:00:00Z"
        })
    }

    /// A record written before the display-id scheme existed: no
    /// appointment_id, message or status fields.
    pub fn legacy_appointment_response(doctor: &str, date: &str, time: &str) -> serde_json::Value {
        json!({
            "full_name": "Legacy Patient",
            "phone": "+91 9900000001",
            "email": "legacy@example.com",
            "doctor": doctor,
            "date": date,
            "time": time,
            "created_at": "2025-01-15T09:00:00Z"
        })
    }

    pub fn patient_response(patient_id: &str, email: &str, full_name: &str) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "email": email,
            "full_name": full_name,
            "phone": "+91 9900000000",
            "created_at": "2025-10-01T08:00:00Z"
        })
    }
}
