//! Sync driver
//!
//! Processes ratings one at a time against a [`RatingsSite`]:
//! search → match engine → (submit | escalate | leave unrated).
//!
//! Failures are contained per record: an error or timeout while handling
//! one rating is logged, the rating is counted as unrated, and the run
//! continues with the next one.

pub mod report;

pub use report::{RecordOutcome, SyncReport};

use crate::matching::{CandidateMatch, DecisionProvider, Escalator, MatchDecision, MatchEngine};
use crate::ratings::MovieRating;
use crate::site::{RatingsSite, SiteError};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Default bound for a single site interaction
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-record sync errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Sync driver for one ratings site
pub struct SyncDriver<S, D> {
    site: S,
    engine: MatchEngine,
    escalator: Escalator<D>,
    request_timeout: Duration,
}

impl<S: RatingsSite, D: DecisionProvider> SyncDriver<S, D> {
    pub fn new(site: S, provider: D) -> Self {
        Self {
            site,
            engine: MatchEngine::new(),
            escalator: Escalator::new(provider),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_engine(mut self, engine: MatchEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    pub fn escalator(&self) -> &Escalator<D> {
        &self.escalator
    }

    /// Process every rating in order and return the totals
    pub async fn run(&mut self, ratings: &[MovieRating]) -> SyncReport {
        let mut report = SyncReport::new(self.site.name());
        info!("Loaded {} ratings to process on {}", ratings.len(), self.site.name());

        for rating in ratings {
            match self.sync_record(rating).await {
                Ok(outcome) => {
                    debug!(title = %rating.title(), year = %rating.year(), ?outcome, "Record processed");
                    report.record(rating, outcome);
                }
                Err(e) => {
                    error!("Error searching for: {}\n{}", rating, e);
                    report.record_failure(rating);
                }
            }
        }

        report
    }

    /// Search, match, and possibly rate a single rating
    pub async fn sync_record(&mut self, rating: &MovieRating) -> Result<RecordOutcome, SyncError> {
        debug!("Searching for: {}", rating);
        let rows = self
            .bounded("search", self.site.search(rating.title()))
            .await?;

        if rows.is_empty() {
            warn!("{} not found.", rating.title());
            return Ok(RecordOutcome::NotFound);
        }

        let candidates = self.collect_candidates(rows);

        match self.engine.classify(rating, candidates) {
            MatchDecision::Exact(candidate) => {
                self.submit(&candidate, rating).await?;
                Ok(RecordOutcome::Rated)
            }
            MatchDecision::Ambiguous(pretenders) => {
                match self.escalator.resolve(&rating.to_string(), pretenders) {
                    Some(candidate) => {
                        self.submit(&candidate, rating).await?;
                        Ok(RecordOutcome::Rated)
                    }
                    None => Ok(RecordOutcome::Skipped),
                }
            }
            MatchDecision::NoMatch => {
                debug!("No candidate resembles {}", rating);
                Ok(RecordOutcome::NoMatch)
            }
        }
    }

    /// Turn result rows into candidates, skipping rows that cannot be read
    fn collect_candidates(&self, rows: Vec<S::Row>) -> Vec<CandidateMatch<S::Row>> {
        rows.into_iter()
            .enumerate()
            .filter_map(|(i, row)| match self.site.extract_title_year(&row) {
                Ok((found_title, found_year)) => {
                    debug!(
                        "Found: {} ({})",
                        found_title.as_deref().unwrap_or("?"),
                        found_year.as_deref().unwrap_or("?")
                    );
                    Some(CandidateMatch::new(row, found_title, found_year))
                }
                Err(e) => {
                    error!("Skipping result row {}: {}", i + 1, e);
                    None
                }
            })
            .collect()
    }

    async fn submit(
        &self,
        candidate: &CandidateMatch<S::Row>,
        rating: &MovieRating,
    ) -> Result<(), SyncError> {
        debug!(found = %candidate, "Submitting rating {}/10", rating.rating());
        self.bounded("submit", self.site.submit_rating(&candidate.row, rating))
            .await
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SiteError>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SyncError::Timeout {
                operation,
                timeout: self.request_timeout,
            }),
        }
    }
}
