// libs/shared/mailer/src/emailjs.rs
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use shared_config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("Email dispatch failed: {0}")]
    Dispatch(String),
}

/// Client for the outbound email delivery service. Delivery is template
/// based: the service owns the message bodies, we hand over a template
/// identifier plus its parameter map.
pub struct MailerClient {
    client: Client,
    base_url: String,
    service_id: String,
    public_key: String,
}

impl MailerClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.email_service_url.clone(),
            service_id: config.email_service_id.clone(),
            public_key: config.email_public_key.clone(),
        }
    }

    /// Dispatch one templated email. Delivery failures are collapsed into a
    /// single error condition; callers decide whether that is fatal.
    pub async fn send_template(
        &self,
        template_id: &str,
        template_params: Value,
    ) -> Result<(), MailerError> {
        if self.base_url.is_empty() || self.service_id.is_empty() || self.public_key.is_empty() {
            return Err(MailerError::NotConfigured);
        }

        let url = format!("{}/api/v1.0/email/send", self.base_url);

        let request_body = json!({
            "service_id": self.service_id,
            "template_id": template_id,
            "user_id": self.public_key,
            "template_params": template_params,
        });

        debug!("Dispatching email template {} via {}", template_id, url);

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| MailerError::Dispatch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Email dispatch failed: {} - {}", status, error_text);
            return Err(MailerError::Dispatch(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        info!("Email template {} dispatched", template_id);
        Ok(())
    }
}
