//! Error types for content store access.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the content store.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status code.
    #[error("store returned status {status} for {table}: {body}")]
    Status {
        /// Table the request targeted.
        table: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The response body did not match the expected row shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
