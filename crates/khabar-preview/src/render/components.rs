//! Shared HTML pieces for preview pages.
//!
//! These are maud functions and text helpers composed by [`super::render_preview`].

use maud::{Markup, PreEscaped, html};

/// Inline CSS for the redirect page humans briefly see.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--accent:#c8102e;--border:rgba(200,16,46,.15)}
body{font-family:"Noto Sans Devanagari",Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;align-items:center;justify-content:center;padding:1.5rem 1rem}
main{max-width:560px;width:100%}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
.card{padding:1.5rem;border:1px solid var(--border);border-radius:10px;text-align:center}
.card img{width:100%;max-height:280px;object-fit:cover;border-radius:8px;margin-bottom:1rem}
.card h1{font-size:1.4rem;font-weight:700;line-height:1.35;margin-bottom:.5rem}
.card p{color:var(--fg2);margin-bottom:1rem}
@media(prefers-color-scheme:dark){
:root{--bg:#0d0d10;--fg:#e5e5e5;--fg2:#a0a0a0;--accent:#ff4d5e;--border:rgba(255,77,94,.2)}
}
"#;

/// Content-Security-Policy header value.
///
/// The only script is the inline redirect; images may come from any HTTPS host.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; script-src 'unsafe-inline'; img-src https: data:; form-action 'none'; frame-ancestors 'none'";

/// Maximum description length in characters before the call-to-action.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Open Graph metadata for a page.
pub struct OpenGraphData<'a> {
    /// OG title.
    pub title: &'a str,
    /// OG description.
    pub description: &'a str,
    /// OG type ("article", "video.other").
    pub og_type: &'a str,
    /// OG image URL (must be HTTP(S)).
    pub image: Option<&'a str>,
    /// Twitter card type ("summary", "summary_large_image").
    pub twitter_card_type: &'a str,
}

/// Render the full preview document: OG tags in `<head>`, a redirect script,
/// and a visible fallback link for browsers with scripts disabled.
pub fn page_shell(og: OpenGraphData<'_>, canonical_url: &str, site_name: &str) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="hi" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (og.title) }
                meta name="description" content=(og.description);
                link rel="canonical" href=(canonical_url);

                // Open Graph
                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(site_name);
                meta property="og:type" content=(og.og_type);
                meta property="og:locale" content="hi_IN";
                @if let Some(image) = og.image {
                    meta property="og:image" content=(image);
                }

                // Twitter Card
                meta name="twitter:card" content=(og.twitter_card_type);
                meta name="twitter:title" content=(og.title);
                meta name="twitter:description" content=(og.description);
                @if let Some(image) = og.image {
                    meta name="twitter:image" content=(image);
                }

                style { (PreEscaped(PAGE_CSS)) }
                script { (PreEscaped(redirect_script(canonical_url))) }
            }
            body {
                main {
                    div class="card" {
                        @if let Some(image) = og.image {
                            img src=(image) alt=(og.title);
                        }
                        h1 { (og.title) }
                        p { (og.description) }
                        a href=(canonical_url) { "पूरी खबर पढ़ें →" }
                    }
                }
            }
        }
    }
}

/// JavaScript that sends the browser to `target`.
///
/// The URL is JSON-encoded with `<` escaped so it cannot close the
/// surrounding `<script>` element.
pub fn redirect_script(target: &str) -> String {
    let literal = serde_json::to_string(target)
        .unwrap_or_else(|_| "\"/\"".to_string())
        .replace('<', "\\u003c");
    format!("window.location.href = {literal};")
}

/// The first sentence of `text`.
///
/// A sentence ends at `.`, `!`, `?` or the Devanagari danda `।` when followed
/// by whitespace or the end of the text, so "3.5%" does not split. Text
/// without a terminator is returned whole (trimmed).
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?' | '।') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                return &text[..idx + c.len_utf8()];
            }
        }
    }

    text
}

/// Fixed Hindi call-to-action pointing readers at a social page.
///
/// Empty when no social link is available.
pub fn call_to_action(social_link: Option<&str>) -> String {
    match social_link {
        Some(link) if is_safe_url(link) => {
            format!("ताज़ा खबरों के लिए हमें फॉलो करें: {link}")
        }
        _ => String::new(),
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate a string to at most `max_chars` characters, appending "..." if
/// truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- first_sentence() tests --

    #[test]
    fn first_sentence_english() {
        assert_eq!(
            first_sentence("Rain lashes Mumbai. Trains delayed."),
            "Rain lashes Mumbai."
        );
    }

    #[test]
    fn first_sentence_hindi_danda() {
        assert_eq!(
            first_sentence("मुंबई में भारी बारिश। ट्रेनें लेट।"),
            "मुंबई में भारी बारिश।"
        );
    }

    #[test]
    fn first_sentence_keeps_decimals() {
        assert_eq!(
            first_sentence("GDP grew 7.5% this quarter. More soon."),
            "GDP grew 7.5% this quarter."
        );
    }

    #[test]
    fn first_sentence_question_and_exclamation() {
        assert_eq!(first_sentence("Who won? India did!"), "Who won?");
        assert_eq!(first_sentence("Wow! Unreal."), "Wow!");
    }

    #[test]
    fn first_sentence_no_terminator() {
        assert_eq!(first_sentence("  breaking news  "), "breaking news");
    }

    #[test]
    fn first_sentence_empty() {
        assert_eq!(first_sentence(""), "");
    }

    // -- call_to_action() tests --

    #[test]
    fn call_to_action_with_link() {
        let cta = call_to_action(Some("https://facebook.com/khabar"));
        assert!(cta.ends_with("https://facebook.com/khabar"));
        assert!(cta.starts_with("ताज़ा खबरों"));
    }

    #[test]
    fn call_to_action_without_link() {
        assert_eq!(call_to_action(None), "");
    }

    #[test]
    fn call_to_action_rejects_unsafe_link() {
        assert_eq!(call_to_action(Some("javascript:alert(1)")), "");
    }

    // -- redirect_script() tests --

    #[test]
    fn redirect_script_quotes_url() {
        assert_eq!(
            redirect_script("https://khabar.in/article/budget"),
            r#"window.location.href = "https://khabar.in/article/budget";"#
        );
    }

    #[test]
    fn redirect_script_cannot_break_out() {
        let script = redirect_script(r#"https://khabar.in/"</script><script>alert(1)"#);
        assert!(!script.contains("</script>"));
        assert!(script.contains("\\\""));
    }

    // -- truncate() tests --

    #[test]
    fn truncate_shorter_than_max() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_longer_than_max() {
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        // "खबर" is 9 bytes but 3 characters
        assert_eq!(truncate("खबर", 3), "खबर");
        assert_eq!(truncate("खबर", 2), "खब...");
    }

    #[test]
    fn hindi_sentence_under_cap_is_kept_whole() {
        let text = format!("{}।", "क".repeat(99));
        let sentence = first_sentence(&text);
        assert_eq!(sentence.chars().count(), 100);
        assert_eq!(truncate(sentence, MAX_DESCRIPTION_LEN), sentence);
    }

    #[test]
    fn hindi_sentence_over_cap_is_cut_at_char_count() {
        let text = "क".repeat(250);
        let out = truncate(&text, MAX_DESCRIPTION_LEN);
        assert_eq!(out, format!("{}...", "क".repeat(MAX_DESCRIPTION_LEN)));
    }

    #[test]
    fn is_safe_url_schemes() {
        assert!(is_safe_url("https://cdn.khabar.in/a.jpg"));
        assert!(is_safe_url("http://cdn.khabar.in/a.jpg"));
        assert!(!is_safe_url("data:image/png;base64,AAAA"));
        assert!(!is_safe_url("javascript:alert(1)"));
    }

    // -- page_shell() tests --

    #[test]
    fn page_shell_emits_meta_tags() {
        let og = OpenGraphData {
            title: "बजट सत्र",
            description: "संसद आज से।",
            og_type: "article",
            image: Some("https://cdn.khabar.in/budget.jpg"),
            twitter_card_type: "summary_large_image",
        };
        let html = page_shell(og, "https://khabar.in/article/budget", "Khabar").into_string();
        assert!(html.contains(r#"<meta property="og:title" content="बजट सत्र">"#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<meta property="og:image" content="https://cdn.khabar.in/budget.jpg">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains(r#"window.location.href = "https://khabar.in/article/budget";"#));
    }

    #[test]
    fn page_shell_escapes_title() {
        let og = OpenGraphData {
            title: r#""><script>alert(1)</script>"#,
            description: "",
            og_type: "article",
            image: None,
            twitter_card_type: "summary",
        };
        let html = page_shell(og, "https://khabar.in/", "Khabar").into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(!html.contains("og:image"));
    }
}
