//! Fixed HTML template for newsletter emails.
//!
//! Email clients ignore `<style>` blocks inconsistently, so all styling is
//! inline. maud escapes every dynamic value.

use chrono::Datelike;
use maud::{DOCTYPE, Markup, html};

/// Render-ready fields for one newsletter item.
#[derive(Debug, Clone)]
pub struct NewsletterItem<'a> {
    /// Small label above the title ("नया लेख", "नया वीडियो", ...).
    pub heading: &'a str,
    pub title: &'a str,
    pub summary: Option<&'a str>,
    pub image: Option<&'a str>,
    /// Front-end URL of the item.
    pub link: String,
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Subject line for an item.
pub fn subject(item: &NewsletterItem<'_>, site_name: &str) -> String {
    format!("{} | {site_name}", item.title)
}

/// Render the email body for an item.
pub fn render_email(item: &NewsletterItem<'_>, site_name: &str, site_url: &str) -> Markup {
    let year = chrono::Utc::now().year();

    html! {
        (DOCTYPE)
        html lang="hi" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (item.title) }
            }
            body style="margin:0;padding:0;background:#f4f4f4;font-family:'Noto Sans Devanagari',Arial,sans-serif" {
                table width="100%" cellpadding="0" cellspacing="0" role="presentation" {
                    tr {
                        td align="center" style="padding:24px 12px" {
                            table width="600" cellpadding="0" cellspacing="0" role="presentation" style="background:#ffffff;border-radius:8px;overflow:hidden" {
                                tr {
                                    td style="background:#c8102e;color:#ffffff;padding:16px 24px;font-size:22px;font-weight:700" {
                                        (site_name)
                                    }
                                }
                                @if let Some(image) = item.image {
                                    tr {
                                        td {
                                            img src=(image) alt=(item.title) width="600" style="display:block;width:100%;height:auto";
                                        }
                                    }
                                }
                                tr {
                                    td style="padding:24px" {
                                        p style="margin:0 0 8px;color:#c8102e;font-size:13px;font-weight:600;text-transform:uppercase" {
                                            (item.heading)
                                        }
                                        h1 style="margin:0 0 12px;font-size:22px;line-height:1.35;color:#111111" {
                                            (item.title)
                                        }
                                        @if let Some(summary) = item.summary {
                                            p style="margin:0 0 20px;font-size:16px;line-height:1.6;color:#444444" {
                                                (summary)
                                            }
                                        }
                                        a href=(item.link) style="display:inline-block;background:#c8102e;color:#ffffff;padding:10px 20px;border-radius:6px;text-decoration:none;font-weight:600" {
                                            "पूरी खबर पढ़ें"
                                        }
                                    }
                                }
                                tr {
                                    td style="padding:16px 24px;font-size:12px;color:#888888;border-top:1px solid #eeeeee" {
                                        "© " (year) " " (site_name) " · "
                                        a href={(site_url) "/newsletter"} style="color:#888888" {
                                            "सदस्यता प्रबंधित करें"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
