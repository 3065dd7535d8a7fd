// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::store::StoreClient;

pub struct AvailabilityService {
    store: StoreClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Slot labels already taken for one doctor-day: the `time` of every
    /// non-cancelled appointment matching the exact doctor and date.
    ///
    /// This set only drives the picker's disabled buttons. It is advisory:
    /// on a storage failure it fails open with an empty set, because the
    /// booking submit re-checks the slot authoritatively anyway.
    pub async fn fetch_booked(&self, doctor: &str, date: NaiveDate) -> HashSet<String> {
        let filters = format!("doctor=eq.{}&date=eq.{}", urlencoding::encode(doctor), date);

        match self.store.query("appointments", &filters).await {
            Ok(records) => {
                let booked: HashSet<String> = records
                    .iter()
                    .filter(|record| record["status"].as_str() != Some("cancelled"))
                    .filter_map(|record| record["time"].as_str().map(str::to_string))
                    .collect();

                debug!("{} booked slots for {} on {}", booked.len(), doctor, date);
                booked
            }
            Err(e) => {
                warn!("Booked-slot lookup failed for {} on {}: {}", doctor, date, e);
                HashSet::new()
            }
        }
    }
}
