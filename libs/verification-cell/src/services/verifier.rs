// libs/verification-cell/src/services/verifier.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_mailer::emailjs::MailerClient;

use crate::models::{VerificationError, VerificationSession, VerificationState};

/// Hard validity window for an issued code.
const CODE_TTL_MINUTES: i64 = 2;

/// Shared in-memory registry of verification sessions, keyed by the opaque
/// session handle the booking form carries. Shared between the verification
/// routes and the booking coordinator, which gates submission on it.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, VerificationSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: Uuid) -> Option<VerificationSession> {
        self.inner.read().await.get(&session_id).cloned()
    }

    pub async fn set(&self, session_id: Uuid, session: VerificationSession) {
        self.inner.write().await.insert(session_id, session);
    }

    pub async fn remove(&self, session_id: Uuid) {
        self.inner.write().await.remove(&session_id);
    }

    /// Whether a booking for `email` may proceed on this session.
    pub async fn is_verified(&self, session_id: Uuid, email: &str) -> bool {
        let normalized = email.trim().to_lowercase();
        self.inner
            .read()
            .await
            .get(&session_id)
            .map(|s| s.state == VerificationState::Verified && s.email == normalized)
            .unwrap_or(false)
    }

    /// Record a completed possession proof for `email`. The stored code, if
    /// any, is dropped: it must not be retained after success.
    pub async fn mark_verified(&self, session_id: Uuid, email: &str) {
        self.inner.write().await.insert(
            session_id,
            VerificationSession {
                email: email.trim().to_lowercase(),
                code: None,
                expires_at: None,
                state: VerificationState::Verified,
            },
        );
    }
}

pub struct VerificationService {
    sessions: SessionStore,
    mailer: MailerClient,
    template_id: String,
}

impl VerificationService {
    pub fn new(config: &AppConfig, sessions: SessionStore) -> Self {
        Self {
            sessions,
            mailer: MailerClient::new(config),
            template_id: config.email_verification_template.clone(),
        }
    }

    /// Issue a possession-proof code for `email` and dispatch it.
    ///
    /// A repeat request replaces any pending code. Requesting with a
    /// different address than the session currently tracks behaves as an
    /// email edit: the session falls back to idle first. On dispatch
    /// failure no code is retained and the session reverts to idle.
    pub async fn request_code(
        &self,
        session_id: Uuid,
        email: &str,
    ) -> Result<DateTime<Utc>, VerificationError> {
        let normalized = email.trim().to_lowercase();

        if let Some(existing) = self.sessions.get(session_id).await {
            if existing.email != normalized {
                debug!("Verification email changed for session {}", session_id);
                self.email_changed(session_id, &normalized).await;
            }
        }

        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        let params = json!({
            "to_email": normalized,
            "passcode": code,
        });

        if let Err(e) = self.mailer.send_template(&self.template_id, params).await {
            warn!("Verification code dispatch failed for session {}", session_id);
            self.sessions
                .set(
                    session_id,
                    VerificationSession {
                        email: normalized,
                        code: None,
                        expires_at: None,
                        state: VerificationState::Idle,
                    },
                )
                .await;
            return Err(VerificationError::Dispatch(e.to_string()));
        }

        self.sessions
            .set(
                session_id,
                VerificationSession {
                    email: normalized,
                    code: Some(code),
                    expires_at: Some(expires_at),
                    state: VerificationState::CodeSent,
                },
            )
            .await;

        info!("Verification code dispatched for session {}", session_id);
        Ok(expires_at)
    }

    pub async fn confirm_code(
        &self,
        session_id: Uuid,
        submitted: &str,
    ) -> Result<(), VerificationError> {
        self.confirm_code_at(session_id, submitted, Utc::now()).await
    }

    async fn confirm_code_at(
        &self,
        session_id: Uuid,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or(VerificationError::NoActiveSession)?;

        if session.state != VerificationState::CodeSent {
            return Err(VerificationError::NoActiveSession);
        }

        let (code, expires_at) = match (&session.code, session.expires_at) {
            (Some(code), Some(expires_at)) => (code.clone(), expires_at),
            _ => return Err(VerificationError::NoActiveSession),
        };

        if now > expires_at {
            // The expired code dies here; a later correct submission finds
            // no active session.
            self.sessions
                .set(
                    session_id,
                    VerificationSession {
                        email: session.email,
                        code: None,
                        expires_at: None,
                        state: VerificationState::Idle,
                    },
                )
                .await;
            return Err(VerificationError::CodeExpired);
        }

        if submitted != code {
            return Err(VerificationError::CodeMismatch);
        }

        self.sessions.mark_verified(session_id, &session.email).await;
        info!("Verification completed for session {}", session_id);
        Ok(())
    }

    /// The booking form's email field was edited. Whatever state the
    /// session was in, it returns to idle and any pending code dies.
    pub async fn email_changed(&self, session_id: Uuid, new_email: &str) {
        self.sessions
            .set(
                session_id,
                VerificationSession {
                    email: new_email.trim().to_lowercase(),
                    code: None,
                    expires_at: None,
                    state: VerificationState::Idle,
                },
            )
            .await;
    }

    #[cfg(test)]
    async fn pending_code(&self, session_id: Uuid) -> Option<String> {
        self.sessions.get(session_id).await.and_then(|s| s.code)
    }
}

fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000u32..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use shared_utils::test_utils::TestConfig;

    async fn service_with_mail_mock(mail_status: u16) -> (VerificationService, MockServer) {
        let mail_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/email/send"))
            .respond_with(ResponseTemplate::new(mail_status))
            .mount(&mail_server)
            .await;

        let config = TestConfig::with_mock_endpoints("http://localhost:54321", &mail_server.uri())
            .to_app_config();
        let service = VerificationService::new(&config, SessionStore::new());

        (service, mail_server)
    }

    #[tokio::test]
    async fn test_request_and_confirm_verifies_session() {
        let (service, _mail) = service_with_mail_mock(200).await;
        let session_id = Uuid::new_v4();

        service.request_code(session_id, "Jane@X.com").await.unwrap();
        let code = service.pending_code(session_id).await.unwrap();
        assert_eq!(code.len(), 6);

        service.confirm_code(session_id, &code).await.unwrap();

        // Verified for the normalized address, and the code is gone.
        assert!(service.sessions.is_verified(session_id, "jane@x.com").await);
        assert!(service.sessions.is_verified(session_id, "JANE@x.com").await);
        assert_eq!(service.pending_code(session_id).await, None);
    }

    #[tokio::test]
    async fn test_mismatched_code_keeps_session_alive() {
        let (service, _mail) = service_with_mail_mock(200).await;
        let session_id = Uuid::new_v4();

        service.request_code(session_id, "jane@x.com").await.unwrap();
        let code = service.pending_code(session_id).await.unwrap();

        let err = service.confirm_code(session_id, "000000").await.unwrap_err();
        assert_matches!(err, VerificationError::CodeMismatch);

        // A correct retry still succeeds: mismatches do not consume the code.
        service.confirm_code(session_id, &code).await.unwrap();
        assert!(service.sessions.is_verified(session_id, "jane@x.com").await);
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected_then_session_is_gone() {
        let (service, _mail) = service_with_mail_mock(200).await;
        let session_id = Uuid::new_v4();

        service.request_code(session_id, "jane@x.com").await.unwrap();
        let code = service.pending_code(session_id).await.unwrap();

        let late = Utc::now() + Duration::seconds(121);
        let err = service
            .confirm_code_at(session_id, &code, late)
            .await
            .unwrap_err();
        assert_matches!(err, VerificationError::CodeExpired);

        // The code was discarded on expiry: the same correct code now finds
        // no active session.
        let err = service.confirm_code(session_id, &code).await.unwrap_err();
        assert_matches!(err, VerificationError::NoActiveSession);
        assert!(!service.sessions.is_verified(session_id, "jane@x.com").await);
    }

    #[tokio::test]
    async fn test_confirm_without_request_fails() {
        let (service, _mail) = service_with_mail_mock(200).await;

        let err = service
            .confirm_code(Uuid::new_v4(), "123456")
            .await
            .unwrap_err();
        assert_matches!(err, VerificationError::NoActiveSession);
    }

    #[tokio::test]
    async fn test_email_edit_invalidates_pending_code() {
        let (service, _mail) = service_with_mail_mock(200).await;
        let session_id = Uuid::new_v4();

        service.request_code(session_id, "jane@x.com").await.unwrap();
        let code = service.pending_code(session_id).await.unwrap();

        service.email_changed(session_id, "other@x.com").await;

        let err = service.confirm_code(session_id, &code).await.unwrap_err();
        assert_matches!(err, VerificationError::NoActiveSession);
    }

    #[tokio::test]
    async fn test_request_for_new_email_discards_old_code() {
        let (service, _mail) = service_with_mail_mock(200).await;
        let session_id = Uuid::new_v4();

        service.request_code(session_id, "jane@x.com").await.unwrap();

        service.request_code(session_id, "other@x.com").await.unwrap();
        let new_code = service.pending_code(session_id).await.unwrap();

        // The pending code is now bound to the new address only.
        service.confirm_code(session_id, &new_code).await.unwrap();
        assert!(service.sessions.is_verified(session_id, "other@x.com").await);
        assert!(!service.sessions.is_verified(session_id, "jane@x.com").await);
    }

    #[tokio::test]
    async fn test_dispatch_failure_reverts_to_idle() {
        let (service, _mail) = service_with_mail_mock(500).await;
        let session_id = Uuid::new_v4();

        let err = service
            .request_code(session_id, "jane@x.com")
            .await
            .unwrap_err();
        assert_matches!(err, VerificationError::Dispatch(_));

        let session = service.sessions.get(session_id).await.unwrap();
        assert_eq!(session.state, VerificationState::Idle);
        assert_eq!(session.code, None);
    }
}
