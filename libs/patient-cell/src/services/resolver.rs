// libs/patient-cell/src/services/resolver.rs
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::store::StoreClient;

use crate::models::{IdentityPolicy, Patient, PatientError};

pub struct PatientResolver {
    store: StoreClient,
    policy: IdentityPolicy,
}

impl PatientResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_policy(config, IdentityPolicy::default())
    }

    pub fn with_policy(config: &AppConfig, policy: IdentityPolicy) -> Self {
        Self {
            store: StoreClient::new(config),
            policy,
        }
    }

    /// Map a submitted (email, name) pair to a stable patient display id,
    /// creating the identity record when no stored patient matches.
    ///
    /// The email is lowercased for lookup and storage; names are compared
    /// case-insensitively. A stored patient with a matching email but a
    /// different name does not match under the default policy, so the same
    /// inbox can legitimately own several patient ids.
    pub async fn resolve(
        &self,
        email: &str,
        full_name: &str,
        phone: &str,
    ) -> Result<String, PatientError> {
        let normalized_email = email.trim().to_lowercase();
        let submitted_name = full_name.trim();

        debug!("Resolving patient identity for {}", normalized_email);

        let filters = format!("email=eq.{}", urlencoding::encode(&normalized_email));
        let records = self
            .store
            .query("patients", &filters)
            .await
            .map_err(|e| PatientError::Storage(e.to_string()))?;

        let candidates: Vec<Patient> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();

        let matched = candidates.iter().find(|patient| match self.policy {
            IdentityPolicy::EmailOnly => true,
            IdentityPolicy::EmailAndName => {
                patient.full_name.trim().to_lowercase() == submitted_name.to_lowercase()
            }
        });

        if let Some(patient) = matched {
            debug!("Matched existing patient {}", patient.patient_id);
            return Ok(patient.patient_id.clone());
        }

        self.create_patient(&normalized_email, submitted_name, phone)
            .await
    }

    async fn create_patient(
        &self,
        normalized_email: &str,
        full_name: &str,
        phone: &str,
    ) -> Result<String, PatientError> {
        let patient_id = self.next_patient_id().await?;

        let patient_data = json!({
            "patient_id": patient_id,
            "email": normalized_email,
            "full_name": full_name,
            "phone": phone,
            "created_at": Utc::now().to_rfc3339(),
        });

        self.store
            .insert("patients", patient_data)
            .await
            .map_err(|e| PatientError::Storage(e.to_string()))?;

        info!("Created patient {} for {}", patient_id, normalized_email);
        Ok(patient_id)
    }

    /// Next sequential display id, derived from the current record count.
    /// Two concurrent first-time bookings can race this count; the clinic
    /// accepts that bounded anomaly instead of a transactional allocator.
    async fn next_patient_id(&self) -> Result<String, PatientError> {
        let all_patients = self
            .store
            .query("patients", "")
            .await
            .map_err(|e| PatientError::Storage(e.to_string()))?;

        Ok(format!("P{:04}", all_patients.len() + 1))
    }
}
