//! HTML rendering for share link previews.
//!
//! Articles and videos share one template; only the OG type, the canonical
//! route and the preferred social network differ by kind.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic escaping of dynamic values.

pub mod components;

use khabar_core::{Content, EntityKind, SocialLinks};
use maud::Markup;

use self::components::{
    MAX_DESCRIPTION_LEN, OpenGraphData, call_to_action, first_sentence, is_safe_url, page_shell,
    truncate,
};
use crate::resolve::ResolvedContent;
use crate::state::AppState;

/// Render a resolved entity into a complete preview document.
///
/// Social links are best effort: a failed or empty lookup renders without the
/// call-to-action instead of failing the request.
pub async fn render_page(state: &AppState, content: &ResolvedContent) -> Markup {
    let socials = match state.store.fetch_social_links().await {
        Ok(links) => links.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, "social links lookup failed, rendering without them");
            SocialLinks::default()
        }
    };

    render_preview(
        content.kind(),
        content.as_content(),
        &socials,
        &state.config.site_url,
        &state.config.site_name,
    )
}

/// Build the preview document for one entity.
pub fn render_preview(
    kind: EntityKind,
    item: &dyn Content,
    socials: &SocialLinks,
    site_url: &str,
    site_name: &str,
) -> Markup {
    let title = item.title().unwrap_or(site_name);
    let description = build_description(item.summary(), socials.preferred_for(kind));
    let canonical = canonical_url(site_url, kind, item);
    let image = item.image().filter(|u| is_safe_url(u));

    let og = OpenGraphData {
        title,
        description: &description,
        og_type: og_type(kind),
        image,
        twitter_card_type: if image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        },
    };

    page_shell(og, &canonical, site_name)
}

/// First sentence of the summary, capped, followed by the call-to-action.
fn build_description(summary: Option<&str>, social_link: Option<&str>) -> String {
    let sentence = truncate(first_sentence(summary.unwrap_or_default()), MAX_DESCRIPTION_LEN);
    let cta = call_to_action(social_link);

    match (sentence.is_empty(), cta.is_empty()) {
        (_, true) => sentence,
        (true, false) => cta,
        (false, false) => format!("{sentence} {cta}"),
    }
}

/// Front-end route the browser is sent on to.
pub fn canonical_url(site_url: &str, kind: EntityKind, item: &dyn Content) -> String {
    format!("{site_url}/{}/{}", kind.route_segment(), item.route_key())
}

fn og_type(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Article => "article",
        EntityKind::Video => "video.other",
    }
}
