//! Short code generation for entities that do not have one yet.
//!
//! Codes are drawn at random from the 62-character alphanumeric alphabet and
//! checked against every code already in the `short_urls` table (and every
//! code planned earlier in the same run). A collision draws again, up to
//! [`MAX_ATTEMPTS`] times per entity.

use std::collections::HashSet;

use khabar_core::shortcode::generate_short_code;
use khabar_core::{ContentStore, EntityKind, NewShortUrl, ShortUrlMapping};
use rand::Rng;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Draws per entity before giving up.
pub const MAX_ATTEMPTS: usize = 16;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Entities seen across all requested kinds.
    pub entities: usize,
    /// Entities that already had a mapping.
    pub existing: usize,
    /// Mappings inserted (or planned, in a dry run).
    pub created: usize,
    /// Inserts the store rejected.
    pub failed: usize,
}

/// Plan new mappings for every id of `kind` that has none in `existing`.
///
/// `used` holds every short code already taken and is extended with each
/// code handed out, so repeated calls within one run never reuse a code.
pub fn plan_short_urls<R: Rng>(
    kind: EntityKind,
    ids: &[Uuid],
    existing: &[ShortUrlMapping],
    used: &mut HashSet<String>,
    rng: &mut R,
) -> Result<Vec<NewShortUrl>> {
    let mapped: HashSet<Uuid> = existing.iter().filter_map(|m| m.target(kind)).collect();

    let mut planned = Vec::new();
    for &id in ids.iter().filter(|id| !mapped.contains(id)) {
        let code = draw_unused(used, rng).ok_or(Error::CodeSpaceExhausted {
            kind,
            id,
            attempts: MAX_ATTEMPTS,
        })?;
        used.insert(code.clone());
        planned.push(NewShortUrl::new(code, kind, id));
    }

    Ok(planned)
}

fn draw_unused<R: Rng>(used: &HashSet<String>, rng: &mut R) -> Option<String> {
    (0..MAX_ATTEMPTS)
        .map(|_| generate_short_code(rng))
        .find(|code| !used.contains(code))
}

/// Create mappings for every unmapped entity of the given kinds.
///
/// With `dry_run` the plan is logged and nothing is inserted. A rejected
/// insert is logged and counted; the run carries on.
pub async fn generate<R: Rng>(
    store: &ContentStore,
    kinds: &[EntityKind],
    dry_run: bool,
    rng: &mut R,
) -> Result<GenerateSummary> {
    let existing = store.list_short_urls().await?;
    let mut used: HashSet<String> = existing.iter().map(|m| m.short_id.clone()).collect();
    let mut summary = GenerateSummary::default();

    tracing::info!(mappings = existing.len(), "loaded existing short urls");

    for &kind in kinds {
        let ids = store.list_entity_ids(kind).await?;
        let planned = plan_short_urls(kind, &ids, &existing, &mut used, rng)?;

        summary.entities += ids.len();
        summary.existing += ids.len() - planned.len();

        tracing::info!(
            kind = %kind,
            entities = ids.len(),
            missing = planned.len(),
            "planned short urls"
        );

        for row in &planned {
            let id = row.article_id.or(row.video_id);

            if dry_run {
                tracing::info!(kind = %kind, short_id = %row.short_id, id = ?id, "dry run: would insert");
                summary.created += 1;
                continue;
            }

            match store.insert_short_url(row).await {
                Ok(()) => {
                    summary.created += 1;
                    tracing::debug!(kind = %kind, short_id = %row.short_id, id = ?id, "short url created");
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        kind = %kind,
                        short_id = %row.short_id,
                        id = ?id,
                        error = %e,
                        "failed to insert short url"
                    );
                }
            }
        }
    }

    Ok(summary)
}
