// libs/doctor-cell/src/router.rs
use axum::{routing::get, Router};

use crate::handlers;

pub fn doctor_routes() -> Router {
    Router::new().route("/", get(handlers::list_doctors))
}
