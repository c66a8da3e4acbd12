//! Newsletter dispatcher.
//!
//! Walks each content table for rows with `newsletter_sent = false`, renders
//! one email per row and sends it to every active subscriber, one request at a
//! time. After the sends for a row finish (successful or not) the row is
//! flagged as sent.

use khabar_core::model::{Article, Content, LiveStream, Video};
use khabar_core::{ARTICLES_TABLE, ContentStore, LIVE_STREAMS_TABLE, VIDEOS_TABLE};
use serde::de::DeserializeOwned;

use crate::config::NewsletterConfig;
use crate::email::{Email, EmailClient};
use crate::template::{self, NewsletterItem};

/// Content tables the dispatcher can send from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NewsletterKind {
    Articles,
    Videos,
    LiveStreams,
}

impl NewsletterKind {
    /// Every kind, in dispatch order.
    pub const ALL: [NewsletterKind; 3] = [Self::Articles, Self::Videos, Self::LiveStreams];

    pub fn table(self) -> &'static str {
        match self {
            Self::Articles => ARTICLES_TABLE,
            Self::Videos => VIDEOS_TABLE,
            Self::LiveStreams => LIVE_STREAMS_TABLE,
        }
    }

    /// Front-end route prefix for links in the email.
    pub fn route_segment(self) -> &'static str {
        match self {
            Self::Articles => "article",
            Self::Videos => "video",
            Self::LiveStreams => "live",
        }
    }

    /// Label shown above the title in the email.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Articles => "नया लेख",
            Self::Videos => "नया वीडियो",
            Self::LiveStreams => "लाइव",
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Unsent rows processed.
    pub items: usize,
    /// Emails accepted by the provider.
    pub sent: usize,
    /// Emails the provider rejected or that failed in transit.
    pub failed: usize,
    /// Rows whose "sent" flag could not be written.
    pub mark_failed: usize,
}

/// Sends unsent content to subscribers.
///
/// Without a mailer the dispatcher runs dry: emails are rendered and logged
/// but nothing is sent and no row is flagged.
pub struct Dispatcher {
    store: ContentStore,
    mailer: Option<EmailClient>,
    config: NewsletterConfig,
}

impl Dispatcher {
    pub fn new(store: ContentStore, mailer: Option<EmailClient>, config: NewsletterConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.mailer.is_none()
    }

    /// Dispatch every unsent row of the given kinds.
    ///
    /// Fails only if the subscriber list cannot be loaded. A table that
    /// cannot be read is logged and skipped.
    pub async fn run(&self, kinds: &[NewsletterKind]) -> khabar_core::Result<DispatchSummary> {
        let recipients: Vec<String> = self
            .store
            .fetch_active_subscribers()
            .await?
            .into_iter()
            .filter(|s| s.is_active && !s.email.trim().is_empty())
            .map(|s| s.email)
            .collect();

        let mut summary = DispatchSummary::default();

        if recipients.is_empty() {
            tracing::info!("no active subscribers, nothing to send");
            return Ok(summary);
        }

        tracing::info!(
            subscribers = recipients.len(),
            dry_run = self.is_dry_run(),
            "starting newsletter run"
        );

        for &kind in kinds {
            match kind {
                NewsletterKind::Articles => {
                    self.dispatch_table::<Article>(kind, &recipients, &mut summary)
                        .await
                }
                NewsletterKind::Videos => {
                    self.dispatch_table::<Video>(kind, &recipients, &mut summary)
                        .await
                }
                NewsletterKind::LiveStreams => {
                    self.dispatch_table::<LiveStream>(kind, &recipients, &mut summary)
                        .await
                }
            }
        }

        Ok(summary)
    }

    async fn dispatch_table<T: Content + DeserializeOwned>(
        &self,
        kind: NewsletterKind,
        recipients: &[String],
        summary: &mut DispatchSummary,
    ) {
        let rows: Vec<T> = match self.store.fetch_unsent(kind.table()).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(table = kind.table(), error = %e, "failed to fetch unsent rows");
                return;
            }
        };

        tracing::info!(table = kind.table(), count = rows.len(), "unsent rows loaded");

        for row in &rows {
            self.dispatch_item(kind, row, recipients, summary).await;
        }
    }

    async fn dispatch_item(
        &self,
        kind: NewsletterKind,
        row: &dyn Content,
        recipients: &[String],
        summary: &mut DispatchSummary,
    ) {
        summary.items += 1;

        let item = newsletter_item(&self.config, kind, row);
        let subject = template::subject(&item, &self.config.site_name);

        let Some(mailer) = &self.mailer else {
            tracing::info!(
                table = kind.table(),
                id = %row.id(),
                subject = %subject,
                recipients = recipients.len(),
                "dry run: would send"
            );
            return;
        };

        let html = template::render_email(&item, &self.config.site_name, &self.config.site_url)
            .into_string();

        for recipient in recipients {
            let email = Email {
                from: self.config.from.clone(),
                to: vec![recipient.clone()],
                subject: subject.clone(),
                html: html.clone(),
            };

            match mailer.send(&email).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        table = kind.table(),
                        id = %row.id(),
                        recipient = %recipient,
                        error = %e,
                        "failed to send newsletter email"
                    );
                }
            }
        }

        if let Err(e) = self.store.mark_newsletter_sent(kind.table(), row.id()).await {
            summary.mark_failed += 1;
            tracing::error!(
                table = kind.table(),
                id = %row.id(),
                error = %e,
                "failed to mark row as sent; it will be sent again next run"
            );
        }
    }
}

/// Email fields for a row. Images that are not plain http(s) URLs are dropped.
fn newsletter_item<'a>(
    config: &'a NewsletterConfig,
    kind: NewsletterKind,
    row: &'a dyn Content,
) -> NewsletterItem<'a> {
    NewsletterItem {
        heading: kind.heading(),
        title: row.title().unwrap_or(&config.site_name),
        summary: row.summary(),
        image: row.image().filter(|url| template::is_safe_url(url)),
        link: item_link(&config.site_url, kind, row),
    }
}

/// Front-end URL for a row: `{site_url}/{route}/{slug-or-id}`.
fn item_link(site_url: &str, kind: NewsletterKind, row: &dyn Content) -> String {
    format!(
        "{}/{}/{}",
        site_url.trim_end_matches('/'),
        kind.route_segment(),
        row.route_key()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use khabar_core::StoreConfig;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE_ID: &str = "0b7f6a3c-9a57-4d8e-a2a7-5d8a0e0b9c11";

    fn config() -> NewsletterConfig {
        NewsletterConfig {
            site_url: "https://khabar.in".to_string(),
            site_name: "Khabar".to_string(),
            email_api_url: String::new(),
            email_api_key: None,
            from: "Khabar <news@khabar.in>".to_string(),
        }
    }

    fn dispatcher(server: &MockServer, send: bool) -> Dispatcher {
        let store = ContentStore::new(StoreConfig {
            url: server.uri(),
            key: SecretString::from("k".to_string()),
        })
        .unwrap();
        let mailer = send.then(|| {
            EmailClient::new(&server.uri(), SecretString::from("re_test".to_string())).unwrap()
        });
        Dispatcher::new(store, mailer, config())
    }

    async fn mount_subscribers(server: &MockServer, emails: &[&str]) {
        let rows: Vec<_> = emails
            .iter()
            .map(|e| serde_json::json!({ "email": e, "is_active": true }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter_subscriptions"))
            .and(query_param("is_active", "eq.true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(server)
            .await;
    }

    async fn mount_unsent_article(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/articles"))
            .and(query_param("newsletter_sent", "eq.false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": ARTICLE_ID,
                "title": "Rain alert",
                "title_hi": "बारिश की चेतावनी",
                "slug": "rain-alert"
            }])))
            .mount(server)
            .await;
    }

    #[test]
    fn item_link_uses_route_and_slug() {
        let article = Article {
            id: Uuid::nil(),
            title: None,
            title_hi: None,
            summary: None,
            summary_hi: None,
            slug: Some("rain-alert".to_string()),
            featured_image_url: None,
            newsletter_sent: false,
        };
        assert_eq!(
            item_link("https://khabar.in/", NewsletterKind::Articles, &article),
            "https://khabar.in/article/rain-alert"
        );

        let stream = LiveStream {
            id: Uuid::nil(),
            title: None,
            title_hi: None,
            description: None,
            description_hi: None,
            thumbnail_url: None,
            stream_url: None,
            newsletter_sent: false,
        };
        assert_eq!(
            item_link("https://khabar.in", NewsletterKind::LiveStreams, &stream),
            format!("https://khabar.in/live/{}", Uuid::nil())
        );
    }

    #[test]
    fn unsafe_image_url_is_dropped() {
        let config = config();
        let mut video = Video {
            id: Uuid::nil(),
            title: Some("Match highlights".to_string()),
            title_hi: None,
            description: None,
            description_hi: None,
            slug: None,
            thumbnail_url: Some("javascript:alert(1)".to_string()),
            video_url: None,
            newsletter_sent: false,
        };

        let item = newsletter_item(&config, NewsletterKind::Videos, &video);
        assert_eq!(item.image, None);
        let html = template::render_email(&item, &config.site_name, &config.site_url).into_string();
        assert!(!html.contains("javascript:"));

        video.thumbnail_url = Some("https://cdn.khabar.in/thumb.jpg".to_string());
        let item = newsletter_item(&config, NewsletterKind::Videos, &video);
        assert_eq!(item.image, Some("https://cdn.khabar.in/thumb.jpg"));
    }

    #[tokio::test]
    async fn sends_to_each_subscriber_then_marks_sent() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &["a@example.com", "b@example.com"]).await;
        mount_unsent_article(&server).await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(serde_json::json!({
                "subject": "बारिश की चेतावनी | Khabar"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/articles"))
            .and(query_param("id", format!("eq.{ARTICLE_ID}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let summary = dispatcher(&server, true)
            .run(&[NewsletterKind::Articles])
            .await
            .unwrap();

        assert_eq!(
            summary,
            DispatchSummary {
                items: 1,
                sent: 2,
                failed: 0,
                mark_failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn send_failure_does_not_stop_later_sends() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &["bad@example.com", "good@example.com"]).await;
        mount_unsent_article(&server).await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(serde_json::json!({ "to": ["bad@example.com"] })))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(serde_json::json!({ "to": ["good@example.com"] })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/articles"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let summary = dispatcher(&server, true)
            .run(&[NewsletterKind::Articles])
            .await
            .unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.mark_failed, 0);
    }

    #[tokio::test]
    async fn mark_failure_is_counted() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &["a@example.com"]).await;
        mount_unsent_article(&server).await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let summary = dispatcher(&server, true)
            .run(&[NewsletterKind::Articles])
            .await
            .unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.mark_failed, 1);
    }

    #[tokio::test]
    async fn dry_run_neither_sends_nor_marks() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &["a@example.com"]).await;
        mount_unsent_article(&server).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let d = dispatcher(&server, false);
        assert!(d.is_dry_run());
        let summary = d.run(&[NewsletterKind::Articles]).await.unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.sent, 0);
    }

    #[tokio::test]
    async fn table_fetch_failure_skips_to_next_table() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &["a@example.com"]).await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": ARTICLE_ID,
                "title": "Match highlights"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/videos"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let summary = dispatcher(&server, true)
            .run(&[NewsletterKind::Articles, NewsletterKind::Videos])
            .await
            .unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.sent, 1);
    }

    #[tokio::test]
    async fn subscriber_fetch_failure_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter_subscriptions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = dispatcher(&server, true).run(&NewsletterKind::ALL).await;
        assert!(matches!(
            result,
            Err(khabar_core::Error::Status { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn no_subscribers_leaves_rows_unsent() {
        let server = MockServer::start().await;
        mount_subscribers(&server, &[]).await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let summary = dispatcher(&server, true)
            .run(&NewsletterKind::ALL)
            .await
            .unwrap();
        assert_eq!(summary, DispatchSummary::default());
    }
}
