//! Resend Mailer
//!
//! Sends email through the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{PaymentError, Result};
use crate::notify::{Mailer, OutgoingEmail};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend configuration
#[derive(Clone)]
pub struct ResendConfig {
    pub api_key: String,

    /// API base URL
    pub base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Resend API client
pub struct ResendMailer {
    client: reqwest::Client,
    config: ResendConfig,
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let body = SendEmailBody {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Email(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(PaymentError::Email(format!("Resend returned {status}: {detail}")))
    }

    fn name(&self) -> &str {
        "resend"
    }
}
