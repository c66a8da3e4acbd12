//! Transactional email client (Resend-compatible `POST /emails`).

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors from the email provider.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Email API returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// One outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Client for the email provider's HTTP API.
pub struct EmailClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl EmailClient {
    /// Create a client for `{base_url}/emails`.
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, EmailError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    /// Send one email. No retries.
    pub async fn send(&self, email: &Email) -> Result<(), EmailError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
