//! Newsletter configuration loaded from environment variables.

use secrecy::SecretString;

/// Settings for the newsletter dispatcher.
#[derive(Debug)]
pub struct NewsletterConfig {
    /// Front-end base URL used for "read more" links.
    pub site_url: String,

    /// Site name shown in the email header and footer.
    pub site_name: String,

    /// Base URL of the transactional email API.
    pub email_api_url: String,

    /// Email API key. Only required when actually sending.
    pub email_api_key: Option<SecretString>,

    /// Sender address, e.g. "Khabar <newsletter@khabar.in>".
    pub from: String,
}

impl NewsletterConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `SITE_URL`: Front-end base URL (default: "http://localhost:5173")
    /// - `SITE_NAME`: Site name (default: "Khabar")
    /// - `RESEND_API_URL`: Email API base URL (default: "https://api.resend.com")
    /// - `RESEND_API_KEY`: Email API key (required unless running dry)
    /// - `NEWSLETTER_FROM`: Sender (default: "Khabar <newsletter@localhost>")
    pub fn from_env() -> anyhow::Result<Self> {
        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("SITE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Khabar".to_string());

        let email_api_url = std::env::var("RESEND_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let email_api_key = std::env::var("RESEND_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let from = std::env::var("NEWSLETTER_FROM")
            .unwrap_or_else(|_| "Khabar <newsletter@localhost>".to_string());

        tracing::info!(
            site_url = %site_url,
            email_api_url = %email_api_url,
            from = %from,
            has_api_key = email_api_key.is_some(),
            "newsletter configuration loaded"
        );

        Ok(Self {
            site_url,
            site_name,
            email_api_url,
            email_api_key,
            from,
        })
    }
}
