use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;
use verification_cell::router::verification_routes;
use verification_cell::services::verifier::SessionStore;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    // One verification session registry shared between the verification
    // routes and the booking submit gate.
    let sessions = SessionStore::new();

    Router::new()
        .route("/", get(|| async { "SS Clinic API is running!" }))
        .nest("/doctors", doctor_routes())
        .nest("/verification", verification_routes(state.clone(), sessions.clone()))
        .nest("/appointments", appointment_routes(state, sessions))
}
