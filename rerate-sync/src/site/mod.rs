//! Ratings site clients
//!
//! A [`RatingsSite`] can search for a title, describe each result row, and
//! submit a rating for a chosen row. The sync driver only talks to this trait.

pub mod criticker;

pub use criticker::{CritickerClient, CritickerRow};

use crate::matching::parse_title_year;
use crate::ratings::MovieRating;
use async_trait::async_trait;
use thiserror::Error;

/// Ratings site errors
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {0}: {1}")]
    HttpStatus(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// External ratings site
#[async_trait]
pub trait RatingsSite: Send + Sync {
    /// Handle for one search result row
    type Row: Send + Sync;

    /// Site name for logs
    fn name(&self) -> &'static str;

    /// Search the site for a title; result rows in page order
    async fn search(&self, title: &str) -> Result<Vec<Self::Row>, SiteError>;

    /// Caption text of a result row, normally `"Title (Year)"`
    fn row_caption(&self, row: &Self::Row) -> Result<String, SiteError>;

    /// Title and year of a result row
    ///
    /// A caption that does not follow `"Title (Year)"` yields `(None, None)`.
    fn extract_title_year(
        &self,
        row: &Self::Row,
    ) -> Result<(Option<String>, Option<String>), SiteError> {
        self.row_caption(row).map(|caption| parse_title_year(&caption))
    }

    /// Rate the film behind `row`
    async fn submit_rating(&self, row: &Self::Row, rating: &MovieRating) -> Result<(), SiteError>;
}

/// Wraps a site and logs ratings instead of submitting them
pub struct DryRun<S> {
    inner: S,
}

impl<S> DryRun<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: RatingsSite> RatingsSite for DryRun<S> {
    type Row = S::Row;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn search(&self, title: &str) -> Result<Vec<Self::Row>, SiteError> {
        self.inner.search(title).await
    }

    fn row_caption(&self, row: &Self::Row) -> Result<String, SiteError> {
        self.inner.row_caption(row)
    }

    fn extract_title_year(
        &self,
        row: &Self::Row,
    ) -> Result<(Option<String>, Option<String>), SiteError> {
        self.inner.extract_title_year(row)
    }

    async fn submit_rating(&self, row: &Self::Row, rating: &MovieRating) -> Result<(), SiteError> {
        let caption = self.inner.row_caption(row).unwrap_or_default();
        tracing::info!(
            site = self.inner.name(),
            "[dry run] Would rate '{}' as {}/10 (watched {})",
            caption,
            rating.rating(),
            rating.rated_at()
        );
        Ok(())
    }
}
