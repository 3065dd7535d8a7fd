use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub email_service_url: String,
    pub email_service_id: String,
    pub email_public_key: String,
    pub email_verification_template: String,
    pub email_confirmation_template: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("APPOINTMENT_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENT_STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("APPOINTMENT_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENT_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            email_service_url: env::var("EMAIL_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_SERVICE_URL not set, using default");
                    "https://api.emailjs.com".to_string()
                }),
            email_service_id: env::var("EMAIL_SERVICE_ID")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_SERVICE_ID not set, using empty value");
                    String::new()
                }),
            email_public_key: env::var("EMAIL_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            email_verification_template: env::var("EMAIL_VERIFICATION_TEMPLATE_ID")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_VERIFICATION_TEMPLATE_ID not set, using empty value");
                    String::new()
                }),
            email_confirmation_template: env::var("EMAIL_CONFIRMATION_TEMPLATE_ID")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_CONFIRMATION_TEMPLATE_ID not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_api_key.is_empty()
    }

    pub fn is_mailer_configured(&self) -> bool {
        !self.email_service_url.is_empty()
            && !self.email_service_id.is_empty()
            && !self.email_public_key.is_empty()
    }
}
