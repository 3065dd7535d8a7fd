// libs/verification-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ConfirmCodeBody, RequestCodeBody, ResetBody, VerificationError};
use crate::services::verifier::{SessionStore, VerificationService};

pub struct VerificationContext {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
}

fn map_error(e: VerificationError) -> AppError {
    match e {
        VerificationError::Dispatch(msg) => AppError::ExternalService(msg),
        other => AppError::BadRequest(other.to_string()),
    }
}

/// Send (or resend) a verification code to the booking contact address.
#[axum::debug_handler]
pub async fn request_code(
    State(ctx): State<Arc<VerificationContext>>,
    Json(body): Json<RequestCodeBody>,
) -> Result<Json<Value>, AppError> {
    if body.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let session_id = body.session_id.unwrap_or_else(Uuid::new_v4);
    let service = VerificationService::new(&ctx.config, ctx.sessions.clone());

    let expires_at = service
        .request_code(session_id, &body.email)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "session_id": session_id,
        "expires_at": expires_at,
        "message": "Verification code sent. It is valid for 2 minutes."
    })))
}

/// Check a submitted code against the pending one.
#[axum::debug_handler]
pub async fn confirm_code(
    State(ctx): State<Arc<VerificationContext>>,
    Json(body): Json<ConfirmCodeBody>,
) -> Result<Json<Value>, AppError> {
    let service = VerificationService::new(&ctx.config, ctx.sessions.clone());

    service
        .confirm_code(body.session_id, body.code.trim())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Email verified successfully."
    })))
}

/// The form's email field was edited: drop any pending or completed
/// verification for the session.
#[axum::debug_handler]
pub async fn reset(
    State(ctx): State<Arc<VerificationContext>>,
    Json(body): Json<ResetBody>,
) -> Result<Json<Value>, AppError> {
    let service = VerificationService::new(&ctx.config, ctx.sessions.clone());
    service.email_changed(body.session_id, &body.email).await;

    Ok(Json(json!({
        "success": true,
        "message": "Verification reset."
    })))
}
