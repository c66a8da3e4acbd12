//! Share link resolution.
//!
//! A share link's last path segment is either:
//! - a 6-character alphanumeric short code, looked up in `short_urls`
//! - the entity UUID, URL-safe base64 encoded
//!
//! Short codes are checked first and never fall through to base64, even if a
//! code would also decode.

use khabar_core::shortcode;
use khabar_core::{Article, Content, ContentStore, EntityKind, Video};
use uuid::Uuid;

use crate::error::PreviewError;

/// The entity a share link points at.
#[derive(Debug)]
pub enum ResolvedContent {
    Article(Box<Article>),
    Video(Box<Video>),
}

impl ResolvedContent {
    /// Which kind of entity this is.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Article(_) => EntityKind::Article,
            Self::Video(_) => EntityKind::Video,
        }
    }

    /// Localized view used by the renderer.
    pub fn as_content(&self) -> &dyn Content {
        match self {
            Self::Article(article) => article.as_ref(),
            Self::Video(video) => video.as_ref(),
        }
    }
}

/// Turn a path segment into the id of a `kind` entity.
///
/// Returns [`PreviewError::ShortUrlNotFound`] when the segment is an unknown
/// short code or does not decode to a UUID.
pub async fn resolve_id(
    store: &ContentStore,
    kind: EntityKind,
    segment: &str,
) -> Result<Uuid, PreviewError> {
    let segment = segment.trim();

    let id = if shortcode::is_short_code(segment) {
        store
            .find_short_url(kind, segment)
            .await?
            .and_then(|mapping| mapping.target(kind))
    } else {
        shortcode::decode_entity_id(segment)
    };

    id.ok_or_else(|| PreviewError::ShortUrlNotFound(segment.to_string()))
}

/// Resolve a share link segment and fetch the entity it points at.
pub async fn resolve(
    store: &ContentStore,
    kind: EntityKind,
    segment: &str,
) -> Result<ResolvedContent, PreviewError> {
    let id = resolve_id(store, kind, segment).await?;
    tracing::debug!(kind = %kind, segment = %segment, id = %id, "share link resolved");

    let content = match kind {
        EntityKind::Article => store
            .fetch_article(id)
            .await?
            .map(|a| ResolvedContent::Article(Box::new(a))),
        EntityKind::Video => store
            .fetch_video(id)
            .await?
            .map(|v| ResolvedContent::Video(Box::new(v))),
    };

    content.ok_or(PreviewError::NotFound { kind, id })
}
