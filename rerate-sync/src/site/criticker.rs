//! Criticker client
//!
//! Session is carried by cookies exported from a logged-in browser. Search
//! results are scraped from the `titlerow` entries of the results page; the
//! rating form takes a 0-100 score and a `DD Mon YYYY` watch date.

use super::{RatingsSite, SiteError};
use crate::ratings::MovieRating;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Url;
use rerate_common::config::{SiteConfig, CRITICKER_COOKIES_ENV_VAR};
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

const USER_AGENT: &str = concat!("rerate/", env!("CARGO_PKG_VERSION"));

static RESULT_ROW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".sr_results_div > .titlerow").expect("valid result row selector")
});

static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".titlerow_mid > .titlerow_name > a").expect("valid title link selector")
});

static RATE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".rate_card a").expect("valid rate link selector"));

/// One Criticker search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritickerRow {
    /// Link text, e.g. `"Inception (2010)"`
    pub caption: String,
    /// Absolute film page URL
    pub film_url: Option<String>,
    /// Absolute rating form URL, present when the film was rated before
    pub rate_url: Option<String>,
}

/// Criticker HTTP client
pub struct CritickerClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CritickerClient {
    /// Create a client from site configuration
    ///
    /// # Errors
    /// Fails when no cookies are configured or the HTTP client cannot be built.
    pub fn new(config: &SiteConfig) -> Result<Self, SiteError> {
        if !config.has_cookies() {
            return Err(SiteError::NotAuthenticated(format!(
                "Cookies for Criticker are not set. Set {} or [criticker] cookies in rerate.toml",
                CRITICKER_COOKIES_ENV_VAR
            )));
        }

        let jar = cookie_jar(config)?;
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::new(jar))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SiteError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn absolute_url(&self, href: &str) -> String {
        absolute_url(&self.base_url, href)
    }
}

#[async_trait]
impl RatingsSite for CritickerClient {
    type Row = CritickerRow;

    fn name(&self) -> &'static str {
        "Criticker"
    }

    async fn search(&self, title: &str) -> Result<Vec<CritickerRow>, SiteError> {
        let url = format!("{}/", self.base_url);
        tracing::debug!(title = %title, url = %url, "Searching Criticker");

        let response = self
            .http_client
            .get(&url)
            .query(&[("search", title), ("type", "films")])
            .send()
            .await
            .map_err(|e| SiteError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::HttpStatus(
                status.as_u16(),
                format!("search for '{}' failed", title),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SiteError::ParseError(e.to_string()))?;

        let rows = parse_search_results(&html, &self.base_url);
        tracing::debug!(title = %title, rows = rows.len(), "Criticker search complete");
        Ok(rows)
    }

    fn row_caption(&self, row: &CritickerRow) -> Result<String, SiteError> {
        Ok(row.caption.clone())
    }

    async fn submit_rating(&self, row: &CritickerRow, rating: &MovieRating) -> Result<(), SiteError> {
        let target = row
            .rate_url
            .as_deref()
            .or(row.film_url.as_deref())
            .ok_or_else(|| {
                SiteError::Unsupported(format!("result '{}' has no film link", row.caption))
            })?;
        let url = self.absolute_url(target);

        let score = (u16::from(rating.rating()) * 10).to_string();
        let watch_date = rating.rated_at().format("%d %b %Y").to_string();

        tracing::debug!(url = %url, score = %score, watch_date = %watch_date, "Submitting rating");

        let response = self
            .http_client
            .post(&url)
            .form(&[("rating", score.as_str()), ("watchdate", watch_date.as_str())])
            .send()
            .await
            .map_err(|e| SiteError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::HttpStatus(
                status.as_u16(),
                format!("rating '{}' failed", row.caption),
            ));
        }

        tracing::info!("Movie {} successfully rated!", rating);
        Ok(())
    }
}

/// Session cookie jar scoped by each cookie's domain and path
fn cookie_jar(config: &SiteConfig) -> Result<Jar, SiteError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| SiteError::ParseError(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

    let jar = Jar::default();
    for cookie in &config.cookies {
        jar.add_cookie_str(&cookie.set_cookie_string(), &url);
    }
    Ok(jar)
}

/// Extract result rows from a Criticker search results page
///
/// Returns an empty list when the page has no results container. A row
/// without a recognizable title link keeps an empty caption.
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<CritickerRow> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_ROW)
        .map(|row| {
            let title_link = row.select(&TITLE_LINK).next();
            let caption = title_link.map(element_text).unwrap_or_default();
            let film_url = title_link
                .and_then(|a| a.value().attr("href"))
                .map(|href| absolute_url(base_url, href));
            let rate_url = row
                .select(&RATE_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| absolute_url(base_url, href));

            CritickerRow {
                caption,
                film_url,
                rate_url,
            }
        })
        .collect()
}

/// Element text with runs of whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}
