//! REST client for the hosted content store.
//!
//! The store speaks the PostgREST dialect: each table is exposed at
//! `{url}/rest/v1/{table}` and filters are query parameters such as
//! `id=eq.{uuid}` or `article_id=not.is.null`. All reads return JSON arrays.
//!
//! The server caps every response at its `max-rows` setting, so list reads
//! page through the table with `limit`/`offset` until a short page comes back.
//!
//! The client is constructed explicitly from a [`StoreConfig`] and cloned
//! into whoever needs it; there is no process-global handle.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{
    Article, EntityKind, NewShortUrl, ShortUrlMapping, SocialLinks, Subscriber, Video,
};
use crate::{SHORT_URLS_TABLE, SOCIALS_TABLE, SUBSCRIPTIONS_TABLE};

/// Per-request timeout for store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows requested per page. Must not exceed the server's `max-rows`.
pub const PAGE_SIZE: usize = 1000;

/// Maximum bytes of an error body kept for logging.
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for the content store.
#[derive(Debug)]
pub struct StoreConfig {
    /// Project base URL (e.g., "https://xyz.supabase.co").
    pub url: String,

    /// API key sent as both `apikey` and bearer token.
    pub key: SecretString,
}

impl StoreConfig {
    /// Load store settings from environment variables.
    ///
    /// - `SUPABASE_URL`: project URL (default: "http://localhost:54321")
    /// - `SUPABASE_KEY`: API key (required)
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string())
            .trim_end_matches('/')
            .to_string();

        let key = std::env::var("SUPABASE_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("SUPABASE_KEY environment variable is required".into()))?;

        Ok(Self {
            url,
            key: SecretString::from(key),
        })
    }
}

/// Handle to the content store. Cheap to clone.
#[derive(Clone)]
pub struct ContentStore {
    http: reqwest::Client,
    rest_url: Arc<str>,
    key: Arc<SecretString>,
    page_size: usize,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("rest_url", &self.rest_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl ContentStore {
    /// Build a client for the given store.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("khabar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let rest_url = format!("{}/rest/v1", config.url.trim_end_matches('/'));
        tracing::debug!(rest_url = %rest_url, "content store client created");

        Ok(Self {
            http,
            rest_url: rest_url.into(),
            key: Arc::new(config.key),
            page_size: PAGE_SIZE,
        })
    }

    /// Override the number of rows requested per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let key = self.key.expose_secret();
        self.http
            .request(method, format!("{}/{table}", self.rest_url))
            .header("apikey", key)
            .bearer_auth(key)
            .header("Accept", "application/json")
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, table: &str, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                table: table.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    /// Select rows from a table with PostgREST filter parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(filters);

        let body = self.send(table, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Select every matching row, one page at a time.
    ///
    /// `filters` must include an `order` so pages do not overlap.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut rows = Vec::new();

        loop {
            let request = self
                .request(Method::GET, table)
                .query(&[("select", columns)])
                .query(filters)
                .query(&[
                    ("limit", self.page_size.to_string()),
                    ("offset", rows.len().to_string()),
                ]);

            let body = self.send(table, request).await?;
            let page: Vec<T> = serde_json::from_str(&body)?;
            let fetched = page.len();
            rows.extend(page);

            tracing::trace!(table = %table, fetched, total = rows.len(), "page loaded");

            if fetched < self.page_size {
                return Ok(rows);
            }
        }
    }

    /// Select the first matching row, if any.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut filters = filters.to_vec();
        filters.push(("limit", "1".to_string()));
        let rows = self.select(table, &filters).await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch an article by id.
    pub async fn fetch_article(&self, id: Uuid) -> Result<Option<Article>> {
        self.select_one(EntityKind::Article.table(), &[("id", format!("eq.{id}"))])
            .await
    }

    /// Fetch a video by id.
    pub async fn fetch_video(&self, id: Uuid) -> Result<Option<Video>> {
        self.select_one(EntityKind::Video.table(), &[("id", format!("eq.{id}"))])
            .await
    }

    /// Look up a short code, restricted to mappings that point at `kind`.
    pub async fn find_short_url(
        &self,
        kind: EntityKind,
        short_id: &str,
    ) -> Result<Option<ShortUrlMapping>> {
        self.select_one(
            SHORT_URLS_TABLE,
            &[
                ("short_id", format!("eq.{short_id}")),
                (kind.mapping_column(), "not.is.null".to_string()),
            ],
        )
        .await
    }

    /// Fetch the singleton social links row.
    pub async fn fetch_social_links(&self) -> Result<Option<SocialLinks>> {
        self.select_one(SOCIALS_TABLE, &[]).await
    }

    /// Rows of a content table that have not been sent in a newsletter yet,
    /// oldest first.
    pub async fn fetch_unsent<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        self.select_all(
            table,
            "*",
            &[
                ("newsletter_sent", "eq.false".to_string()),
                ("order", "created_at.asc,id.asc".to_string()),
            ],
        )
        .await
    }

    /// Flag a content row as sent.
    pub async fn mark_newsletter_sent(&self, table: &str, id: Uuid) -> Result<()> {
        let request = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "newsletter_sent": true }));

        self.send(table, request).await?;
        Ok(())
    }

    /// All subscribers currently opted in.
    pub async fn fetch_active_subscribers(&self) -> Result<Vec<Subscriber>> {
        self.select_all(
            SUBSCRIPTIONS_TABLE,
            "*",
            &[
                ("is_active", "eq.true".to_string()),
                ("order", "email.asc".to_string()),
            ],
        )
        .await
    }

    /// Ids of every entity of the given kind.
    pub async fn list_entity_ids(&self, kind: EntityKind) -> Result<Vec<Uuid>> {
        #[derive(serde::Deserialize)]
        struct IdRow {
            id: Uuid,
        }

        let rows: Vec<IdRow> = self
            .select_all(kind.table(), "id", &[("order", "id.asc".to_string())])
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    /// Every existing short URL mapping.
    pub async fn list_short_urls(&self) -> Result<Vec<ShortUrlMapping>> {
        self.select_all(SHORT_URLS_TABLE, "*", &[("order", "short_id.asc".to_string())])
            .await
    }

    /// Insert a new short URL mapping.
    pub async fn insert_short_url(&self, row: &NewShortUrl) -> Result<()> {
        let request = self
            .request(Method::POST, SHORT_URLS_TABLE)
            .header("Prefer", "return=minimal")
            .json(row);

        self.send(SHORT_URLS_TABLE, request).await?;
        Ok(())
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
