//! Canonical movie rating record and its validator
//!
//! A [`MovieRating`] can only be obtained through [`RawRating::validate`], so
//! every record in the pipeline satisfies:
//! - title is trimmed and non-empty
//! - rating is an integer in `1..=10`
//! - `rated_at` is a calendar date
//!
//! The year is the one soft field: a year that is not four digits still
//! produces a record, flagged with [`MovieRating::year_invalid`] and a warning.

use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted rating
pub const MAX_RATING: i64 = 10;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));

/// Hard validation failure for a single row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Rating is not a number: '{0}'")]
    UnparseableRating(String),

    #[error("Rating must be between 1 and 10 (got {0})")]
    RatingOutOfRange(i64),

    #[error("Date '{value}' does not match format '{format}'")]
    UnparseableDate { value: String, format: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle => "title",
            ValidationError::UnparseableRating(_) | ValidationError::RatingOutOfRange(_) => {
                "rating"
            }
            ValidationError::UnparseableDate { .. } => "rated_at",
        }
    }
}

/// Raw field values as decoded from one source row
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub title: String,
    pub rating: String,
    pub year: String,
    pub rated_at: String,
    /// `chrono` format string for `rated_at`
    pub date_format: String,
}

impl RawRating {
    /// Validate and normalize into a canonical record
    ///
    /// The rating is rounded to the nearest integer with ties away from zero
    /// (`f64::round`), so `1.5` becomes 2 and `10.5` becomes 11 (rejected).
    pub fn validate(self) -> Result<MovieRating, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let rating = round_rating(&self.rating)?;

        let rated_at = NaiveDate::parse_from_str(self.rated_at.trim(), &self.date_format)
            .map_err(|_| ValidationError::UnparseableDate {
                value: self.rated_at.clone(),
                format: self.date_format.clone(),
            })?;

        let year = self.year.trim().to_string();
        let year_invalid = !YEAR_RE.is_match(&year);

        let record = MovieRating {
            title: title.to_string(),
            rating,
            year,
            rated_at,
            year_invalid,
        };

        if year_invalid {
            tracing::warn!(
                title = %record.title,
                year = %record.year,
                rating = record.rating,
                rated_at = %record.rated_at,
                "Invalid year format: '{}'",
                record.year
            );
        }

        Ok(record)
    }
}

fn round_rating(raw: &str) -> Result<u8, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::UnparseableRating(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ValidationError::UnparseableRating(raw.to_string()));
    }

    let rounded = value.round() as i64;
    if !(MIN_RATING..=MAX_RATING).contains(&rounded) {
        return Err(ValidationError::RatingOutOfRange(rounded));
    }

    Ok(rounded as u8)
}

/// Unified movie rating, independent of the export it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRating {
    title: String,
    rating: u8,
    year: String,
    rated_at: NaiveDate,
    year_invalid: bool,
}

impl MovieRating {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rating in `1..=10`
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn rated_at(&self) -> NaiveDate {
        self.rated_at
    }

    /// True when the year did not match four digits
    pub fn year_invalid(&self) -> bool {
        self.year_invalid
    }

    /// Deduplication key: lowercased title plus year
    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            title: self.title.to_lowercase(),
            year: self.year.clone(),
        }
    }
}

impl fmt::Display for MovieRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// `(title.lower(), year)` key used to deduplicate across sources
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub title: String,
    pub year: String,
}
