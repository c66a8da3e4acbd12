//! Route definitions for the preview service.
//!
//! ## Routes
//!
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /api/articles/p/{short_id}` - Article preview by short code
//! - `GET /api/articles/preview/{id}` - Article preview by encoded id
//! - `GET /api/videos/p/{short_id}` - Video preview by short code
//! - `GET /api/videos/preview/{id}` - Video preview by encoded id
//!
//! Both URL families of a kind accept either segment form; the resolver
//! decides which one it is.

mod health;
mod preview;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::state::AppState;

pub use preview::{article_preview, video_preview};

/// Build the complete preview service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/api/articles/p/{short_id}", get(article_preview))
        .route("/api/articles/preview/{id}", get(article_preview))
        .route("/api/videos/p/{short_id}", get(video_preview))
        .route("/api/videos/preview/{id}", get(video_preview))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Crawlers must be able to fetch these pages for link previews.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}
