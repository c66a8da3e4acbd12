//! Preview route handlers.
//!
//! One handler per entity kind; both delegate to [`preview`], which resolves
//! the segment, renders the page and attaches response headers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use khabar_core::EntityKind;

use crate::error::PreviewError;
use crate::render;
use crate::resolve;
use crate::state::AppState;

/// `GET /api/articles/{p,preview}/{segment}`
pub async fn article_preview(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::Article, &segment).await
}

/// `GET /api/videos/{p,preview}/{segment}`
pub async fn video_preview(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::Video, &segment).await
}

/// Resolve a share link and answer with its preview document.
async fn preview(
    state: &AppState,
    kind: EntityKind,
    segment: &str,
) -> Result<Response, PreviewError> {
    let content = resolve::resolve(&state.store, kind, segment).await?;
    let markup = render::render_page(state, &content).await;

    tracing::debug!(kind = %kind, segment = %segment, "preview rendered");

    Ok(build_response(markup.into_string()))
}

/// Build an HTTP response with HTML content and security headers.
///
/// Every request re-reads the store, so responses are marked `no-cache`.
fn build_response(html: String) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    (StatusCode::OK, headers, html).into_response()
}
