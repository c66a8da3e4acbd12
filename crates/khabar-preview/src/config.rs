//! Application configuration loaded from environment variables.

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8081").
    pub bind_addr: String,

    /// Base URL of the front-end app that browsers are redirected to.
    /// e.g., "https://khabar.in"
    pub site_url: String,

    /// Site name shown in `og:site_name` and as the fallback title.
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Store credentials are loaded separately via
    /// [`khabar_core::StoreConfig::from_env`].
    ///
    /// Optional:
    /// - `PREVIEW_BIND_ADDR`: Server bind address (default: "0.0.0.0:8081")
    /// - `SITE_URL`: Front-end base URL (default: "http://localhost:5173")
    /// - `SITE_NAME`: Site name (default: "Khabar")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("PREVIEW_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("SITE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Khabar".to_string());

        tracing::info!(
            bind_addr = %bind_addr,
            site_url = %site_url,
            site_name = %site_name,
            "preview configuration loaded"
        );

        Ok(Self {
            bind_addr,
            site_url,
            site_name,
        })
    }
}
