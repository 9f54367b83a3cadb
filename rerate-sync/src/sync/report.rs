//! Sync run accounting

use crate::ratings::table::render_grid;
use crate::ratings::MovieRating;
use tracing::info;

/// What happened to one rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Rating submitted
    Rated,
    /// Search returned no rows
    NotFound,
    /// No row resembled the rating
    NoMatch,
    /// Ambiguous and no candidate was chosen
    Skipped,
}

impl RecordOutcome {
    pub fn is_rated(self) -> bool {
        self == RecordOutcome::Rated
    }
}

/// Totals for one sync run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub site: String,
    pub rated: Vec<MovieRating>,
    pub unrated: Vec<MovieRating>,
    /// Unrated records whose processing failed with an error or timeout
    pub failed: usize,
}

impl SyncReport {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            ..Self::default()
        }
    }

    /// Account for one processed rating
    pub fn record(&mut self, rating: &MovieRating, outcome: RecordOutcome) {
        if outcome.is_rated() {
            self.rated.push(rating.clone());
        } else {
            self.unrated.push(rating.clone());
        }
    }

    /// Account for a rating whose processing failed
    pub fn record_failure(&mut self, rating: &MovieRating) {
        self.failed += 1;
        self.unrated.push(rating.clone());
    }

    pub fn total(&self) -> usize {
        self.rated.len() + self.unrated.len()
    }

    /// Grid table of unrated titles and years
    pub fn unrated_table(&self) -> String {
        let rows: Vec<Vec<&str>> = self
            .unrated
            .iter()
            .map(|r| vec![r.title(), r.year()])
            .collect();
        render_grid(&["Title", "Year"], &rows)
    }

    /// Log totals and the unrated table
    pub fn log_summary(&self) {
        info!("[{}] Total Rated: {}", self.site, self.rated.len());
        info!("[{}] Total Not Rated: {}", self.site, self.unrated.len());
        if self.failed > 0 {
            info!("[{}] Failed with errors: {}", self.site, self.failed);
        }
        info!("Movies not rated:\n{}", self.unrated_table());
    }
}
