//! Row models for the content store tables.
//!
//! Every content row carries a default-language field and an optional Hindi
//! (`*_hi`) variant. The [`Content`] trait exposes the localized view, which
//! prefers the Hindi text whenever it is present and non-blank.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ARTICLES_TABLE, LIVE_STREAMS_TABLE, VIDEOS_TABLE};

/// The kind of entity a short URL or preview route points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Article,
    Video,
}

impl EntityKind {
    /// Content store table holding this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Article => ARTICLES_TABLE,
            Self::Video => VIDEOS_TABLE,
        }
    }

    /// Foreign-key column in the short URL table referencing this kind.
    pub fn mapping_column(self) -> &'static str {
        match self {
            Self::Article => "article_id",
            Self::Video => "video_id",
        }
    }

    /// Path segment of the front-end route (`/article/...`, `/video/...`).
    pub fn route_segment(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
        }
    }

    /// Human-readable name used in logs and error bodies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Video => "Video",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.route_segment())
    }
}

/// Pick the Hindi value when present and non-blank, else the default value.
pub fn localized<'a>(hindi: Option<&'a str>, default: Option<&'a str>) -> Option<&'a str> {
    let non_blank = |s: &&str| !s.trim().is_empty();
    hindi.filter(non_blank).or(default.filter(non_blank))
}

/// Localized, render-ready view of a content row.
pub trait Content {
    /// Entity UUID.
    fn id(&self) -> Uuid;

    /// Title, Hindi preferred.
    fn title(&self) -> Option<&str>;

    /// Summary or description, Hindi preferred.
    fn summary(&self) -> Option<&str>;

    /// Featured image or thumbnail URL.
    fn image(&self) -> Option<&str>;

    /// URL slug, if the row has one.
    fn slug(&self) -> Option<&str>;

    /// Front-end path segment: the slug when set, else the id.
    fn route_key(&self) -> String {
        self.slug()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.id().to_string())
    }
}

/// A row from the `articles` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_hi: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    /// Whether the newsletter dispatcher has already sent this row.
    #[serde(default)]
    pub newsletter_sent: bool,
}

impl Content for Article {
    fn id(&self) -> Uuid {
        self.id
    }

    fn title(&self) -> Option<&str> {
        localized(self.title_hi.as_deref(), self.title.as_deref())
    }

    fn summary(&self) -> Option<&str> {
        localized(self.summary_hi.as_deref(), self.summary.as_deref())
    }

    fn image(&self) -> Option<&str> {
        self.featured_image_url.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

/// A row from the `videos` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Video {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_hi: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub newsletter_sent: bool,
}

impl Content for Video {
    fn id(&self) -> Uuid {
        self.id
    }

    fn title(&self) -> Option<&str> {
        localized(self.title_hi.as_deref(), self.title.as_deref())
    }

    fn summary(&self) -> Option<&str> {
        localized(self.description_hi.as_deref(), self.description.as_deref())
    }

    fn image(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

/// A row from the `live_streams` table. Only the newsletter reads these.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveStream {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_hi: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub newsletter_sent: bool,
}

impl Content for LiveStream {
    fn id(&self) -> Uuid {
        self.id
    }

    fn title(&self) -> Option<&str> {
        localized(self.title_hi.as_deref(), self.title.as_deref())
    }

    fn summary(&self) -> Option<&str> {
        localized(self.description_hi.as_deref(), self.description.as_deref())
    }

    fn image(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        None
    }
}

/// A row from the `short_urls` table.
///
/// Exactly one of `article_id` / `video_id` is expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShortUrlMapping {
    pub short_id: String,
    #[serde(default)]
    pub article_id: Option<Uuid>,
    #[serde(default)]
    pub video_id: Option<Uuid>,
}

impl ShortUrlMapping {
    /// The referenced id for the given kind, if this row points at that kind.
    pub fn target(&self, kind: EntityKind) -> Option<Uuid> {
        match kind {
            EntityKind::Article => self.article_id,
            EntityKind::Video => self.video_id,
        }
    }
}

/// Insert payload for a new short URL row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewShortUrl {
    pub short_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<Uuid>,
}

impl NewShortUrl {
    /// Build a mapping row for one entity of the given kind.
    pub fn new(short_id: impl Into<String>, kind: EntityKind, id: Uuid) -> Self {
        let (article_id, video_id) = match kind {
            EntityKind::Article => (Some(id), None),
            EntityKind::Video => (None, Some(id)),
        };
        Self {
            short_id: short_id.into(),
            article_id,
            video_id,
        }
    }
}

/// The singleton row from the `socials` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
}

impl SocialLinks {
    /// First non-blank link for the kind's preferred networks.
    ///
    /// Articles point readers at Facebook, then Twitter; videos at YouTube,
    /// then Facebook.
    pub fn preferred_for(&self, kind: EntityKind) -> Option<&str> {
        let order = match kind {
            EntityKind::Article => [&self.facebook, &self.twitter],
            EntityKind::Video => [&self.youtube, &self.facebook],
        };
        order
            .into_iter()
            .filter_map(|link| link.as_deref())
            .find(|link| !link.trim().is_empty())
    }
}

/// A row from the `newsletter_subscriptions` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Subscriber {
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article() -> Article {
        Article {
            id: Uuid::nil(),
            title: Some("Budget session begins".to_string()),
            title_hi: None,
            summary: Some("Parliament convenes today.".to_string()),
            summary_hi: None,
            slug: Some("budget-session-begins".to_string()),
            featured_image_url: None,
            newsletter_sent: false,
        }
    }

    #[test]
    fn localized_prefers_hindi() {
        assert_eq!(localized(Some("नमस्ते"), Some("hello")), Some("नमस्ते"));
    }

    #[test]
    fn localized_falls_back_on_blank_hindi() {
        assert_eq!(localized(Some("   "), Some("hello")), Some("hello"));
        assert_eq!(localized(None, Some("hello")), Some("hello"));
    }

    #[test]
    fn localized_none_when_both_blank() {
        assert_eq!(localized(Some(""), Some(" ")), None);
        assert_eq!(localized(None, None), None);
    }

    #[test]
    fn article_title_hindi_wins() {
        let mut a = article();
        a.title_hi = Some("बजट सत्र शुरू".to_string());
        assert_eq!(a.title(), Some("बजट सत्र शुरू"));
        assert_eq!(a.summary(), Some("Parliament convenes today."));
    }

    #[test]
    fn route_key_uses_slug_then_id() {
        let mut a = article();
        assert_eq!(a.route_key(), "budget-session-begins");
        a.slug = Some(String::new());
        assert_eq!(a.route_key(), Uuid::nil().to_string());
    }

    #[test]
    fn article_deserializes_with_missing_optional_fields() {
        let json = r#"{"id":"0b7f6a3c-9a57-4d8e-a2a7-5d8a0e0b9c11","title":"Hello"}"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.title.as_deref(), Some("Hello"));
        assert!(a.title_hi.is_none());
        assert!(!a.newsletter_sent);
    }

    #[test]
    fn mapping_target_by_kind() {
        let id = Uuid::new_v4();
        let mapping = ShortUrlMapping {
            short_id: "Ab3dE9".to_string(),
            article_id: Some(id),
            video_id: None,
        };
        assert_eq!(mapping.target(EntityKind::Article), Some(id));
        assert_eq!(mapping.target(EntityKind::Video), None);
    }

    #[test]
    fn new_short_url_serializes_one_column() {
        let id = Uuid::nil();
        let row = NewShortUrl::new("Zz9yX8", EntityKind::Video, id);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "short_id": "Zz9yX8",
                "video_id": "00000000-0000-0000-0000-000000000000",
            })
        );
    }

    #[test]
    fn social_links_preference_order() {
        let links = SocialLinks {
            facebook: Some("https://facebook.com/khabar".to_string()),
            twitter: Some("https://x.com/khabar".to_string()),
            instagram: None,
            youtube: Some("  ".to_string()),
        };
        assert_eq!(
            links.preferred_for(EntityKind::Article),
            Some("https://facebook.com/khabar")
        );
        // Blank YouTube link is skipped.
        assert_eq!(
            links.preferred_for(EntityKind::Video),
            Some("https://facebook.com/khabar")
        );
        assert_eq!(SocialLinks::default().preferred_for(EntityKind::Video), None);
    }

    #[test]
    fn subscriber_active_by_default() {
        let s: Subscriber = serde_json::from_str(r#"{"email":"a@b.in"}"#).unwrap();
        assert!(s.is_active);
    }
}
