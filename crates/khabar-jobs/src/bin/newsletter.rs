//! Newsletter dispatch job.
//!
//! Emails every unsent article, video and live stream to all active
//! subscribers, then flags each row as sent. Meant to run from a scheduler.
//!
//! # Usage
//!
//! ```bash
//! # Render and log what would go out, without sending or flagging rows
//! newsletter --dry-run
//!
//! # Send only videos
//! newsletter --kind videos
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use khabar_core::{ContentStore, StoreConfig};
use khabar_jobs::{Dispatcher, EmailClient, NewsletterConfig, NewsletterKind};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Newsletter dispatch job.
#[derive(Parser, Debug)]
#[command(name = "newsletter")]
#[command(about = "Email unsent content to newsletter subscribers")]
#[command(version)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Dry run - render and log emails without sending or marking rows
    #[arg(long)]
    dry_run: bool,

    /// Only dispatch this kind of content
    #[arg(long, value_enum)]
    kind: Option<NewsletterKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = NewsletterConfig::from_env()?;
    let store = ContentStore::new(StoreConfig::from_env()?)?;

    let mailer = if args.dry_run {
        None
    } else {
        let key = config
            .email_api_key
            .take()
            .context("RESEND_API_KEY environment variable is required unless --dry-run is set")?;
        Some(EmailClient::new(&config.email_api_url, key)?)
    };

    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => NewsletterKind::ALL.to_vec(),
    };

    let dispatcher = Dispatcher::new(store, mailer, config);
    let summary = dispatcher
        .run(&kinds)
        .await
        .context("newsletter run aborted")?;

    tracing::info!(
        items = summary.items,
        sent = summary.sent,
        failed = summary.failed,
        mark_failed = summary.mark_failed,
        dry_run = args.dry_run,
        "newsletter run complete"
    );

    Ok(())
}
