//! Khabar Preview - social preview pages for shared article and video links.
//!
//! Crawlers (WhatsApp, Facebook, X, Telegram) do not run the front-end app,
//! so share links point here instead. Each request resolves the link to an
//! article or video, fetches it from the content store, and answers with a
//! small HTML document carrying Open Graph and Twitter Card tags plus a script
//! that sends real browsers on to the canonical front-end route.
//!
//! # Architecture
//!
//! - **Resolve**: Decides whether a path segment is a 6-character short code or
//!   a base64-encoded UUID and turns it into an entity
//! - **Render**: Builds the preview document with maud (auto-escaped templates)
//! - **Routes**: One handler per entity kind, shared by the `p/` and `preview/`
//!   URL families
//!
//! # URL Pattern
//!
//! ```text
//! GET /api/articles/p/{short_id}
//! GET /api/articles/preview/{id}
//! GET /api/videos/p/{short_id}
//! GET /api/videos/preview/{id}
//! ```
//!
//! Nothing is cached: every request re-reads the store.

pub mod config;
pub mod error;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
