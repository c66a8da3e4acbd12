//! Khabar maintenance jobs.
//!
//! This crate backs the scheduled command-line tools that run against the
//! content store:
//!
//! - [`newsletter`] - emails unsent articles, videos and live streams to every
//!   active subscriber, then flags each row as sent
//! - [`shortlinks`] - creates 6-character short codes for entities that do
//!   not have one yet
//!
//! # Newsletter flow
//!
//! ```text
//! ┌──────────────────┐
//! │  content tables  │  rows with newsletter_sent = false
//! └────────┬─────────┘
//!          │  one item at a time
//!          ▼
//! ┌──────────────────┐
//! │     template     │  fixed HTML email per item
//! └────────┬─────────┘
//!          │  one send per subscriber, sequential
//!          ▼
//! ┌──────────────────┐
//! │   EmailClient    │  transactional email API
//! └────────┬─────────┘
//!          │
//!          ▼
//!   mark row as sent
//! ```
//!
//! There are no retries and no transaction: a crash mid-run leaves some rows
//! sent and others not, and a failed "mark sent" update means that row goes
//! out again on the next run.

pub mod config;
pub mod email;
mod error;
pub mod newsletter;
pub mod shortlinks;
pub mod template;

pub use config::NewsletterConfig;
pub use email::{Email, EmailClient, EmailError};
pub use error::{Error, Result};
pub use newsletter::{DispatchSummary, Dispatcher, NewsletterKind};
pub use shortlinks::{GenerateSummary, generate, plan_short_urls};
