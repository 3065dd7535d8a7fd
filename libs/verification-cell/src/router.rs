// libs/verification-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::{self, VerificationContext};
use crate::services::verifier::SessionStore;

pub fn verification_routes(config: Arc<AppConfig>, sessions: SessionStore) -> Router {
    let context = Arc::new(VerificationContext { config, sessions });

    Router::new()
        .route("/request", post(handlers::request_code))
        .route("/confirm", post(handlers::confirm_code))
        .route("/reset", post(handlers::reset))
        .with_state(context)
}
