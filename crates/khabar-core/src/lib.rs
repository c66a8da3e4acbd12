//! Core types and the content store client shared by Khabar services.
//!
//! This crate provides:
//! - Row models for the content store tables (articles, videos, live streams,
//!   short URLs, social links, newsletter subscriptions)
//! - A REST client for the hosted content store (PostgREST dialect)
//! - Short code detection, generation, and base64 entity id decoding
//! - Shared error types

mod error;
pub mod model;
pub mod shortcode;
pub mod store;

// ═══════════════════════════════════════════════════════════════════════════
// Table names
// ═══════════════════════════════════════════════════════════════════════════

/// Long-form news articles.
pub const ARTICLES_TABLE: &str = "articles";

/// Uploaded and embedded videos.
pub const VIDEOS_TABLE: &str = "videos";

/// Live stream announcements.
pub const LIVE_STREAMS_TABLE: &str = "live_streams";

/// Short code to entity id mappings.
pub const SHORT_URLS_TABLE: &str = "short_urls";

/// Singleton row of outbound social profile links.
pub const SOCIALS_TABLE: &str = "socials";

/// Newsletter subscriber list.
pub const SUBSCRIPTIONS_TABLE: &str = "newsletter_subscriptions";

pub use error::{Error, Result};
pub use model::{
    Article, Content, EntityKind, LiveStream, NewShortUrl, ShortUrlMapping, SocialLinks,
    Subscriber, Video,
};
pub use store::{ContentStore, StoreConfig};
