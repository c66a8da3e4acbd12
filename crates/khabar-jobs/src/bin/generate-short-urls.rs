//! Short URL generator.
//!
//! Creates a 6-character short code for every article and video that does
//! not have a `short_urls` row yet.
//!
//! # Usage
//!
//! ```bash
//! # Show what would be created
//! generate-short-urls --dry-run
//!
//! # Create the missing mappings
//! generate-short-urls
//! ```

use anyhow::Result;
use clap::Parser;
use khabar_core::{ContentStore, EntityKind, StoreConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Short URL generator.
#[derive(Parser, Debug)]
#[command(name = "generate-short-urls")]
#[command(about = "Create short codes for articles and videos that lack one")]
#[command(version)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Dry run - show the plan without inserting rows
    #[arg(long)]
    dry_run: bool,
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

    let store = ContentStore::new(StoreConfig::from_env()?)?;
    let mut rng = StdRng::from_entropy();

    let summary = khabar_jobs::generate(
        &store,
        &[EntityKind::Article, EntityKind::Video],
        args.dry_run,
        &mut rng,
    )
    .await?;

    println!();
    println!("Summary");
    println!("-------");
    println!("Entities:             {}", summary.entities);
    println!("Already mapped:       {}", summary.existing);
    println!("Created:              {}", summary.created);
    println!("Failed:               {}", summary.failed);
    if args.dry_run {
        println!();
        println!("Dry run - no changes made.");
    }

    Ok(())
}
