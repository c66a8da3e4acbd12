//! Error types for the preview service.
//!
//! Crawlers only care about the status code, so errors are plain text:
//! 404 for anything that does not resolve, 500 for store failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use khabar_core::EntityKind;
use uuid::Uuid;

/// Preview service error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The path segment is neither a known short code nor a decodable id.
    #[error("short URL not found: {0}")]
    ShortUrlNotFound(String),

    /// The id resolved but the entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Which table was searched.
        kind: EntityKind,
        /// The resolved id.
        id: Uuid,
    },

    /// Content store query error.
    #[error("store error: {0}")]
    Store(#[from] khabar_core::Error),
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        match &self {
            Self::ShortUrlNotFound(segment) => {
                tracing::debug!(segment = %segment, "short URL not found");
                (StatusCode::NOT_FOUND, "Short URL not found").into_response()
            }
            Self::NotFound { kind, id } => {
                tracing::debug!(kind = %kind, id = %id, "entity not found");
                (StatusCode::NOT_FOUND, format!("{} not found", kind.label())).into_response()
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
