// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use verification_cell::services::verifier::SessionStore;

use crate::handlers::{self, BookingContext};
use crate::services::consistency::SlotGuard;

pub fn appointment_routes(config: Arc<AppConfig>, sessions: SessionStore) -> Router {
    let context = Arc::new(BookingContext {
        config,
        sessions,
        slots: SlotGuard::new(),
    });

    Router::new()
        .route("/", post(handlers::submit_booking))
        .route("/availability", get(handlers::get_availability))
        .route("/dashboard", get(handlers::list_appointments))
        .with_state(context)
}
