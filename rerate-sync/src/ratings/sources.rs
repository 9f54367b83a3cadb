//! Source parsers for rating exports
//!
//! Each export format is a typed row ([`SourceRow`]) decoded from a
//! header-driven CSV file. Column names are fixed per format:
//!
//! | Source    | Title            | Rating        | Year   | Date         |
//! |-----------|------------------|---------------|--------|--------------|
//! | IMDb      | `Original Title` | `Your Rating` | `Year` | `Date Rated` |
//! | Kinopoisk | `Name`           | `Rating_10`   | `Year` | `Date`       |
//!
//! Failures are contained per row: a row missing its title or rating, a row
//! whose year or date column is absent (including short rows), or one that
//! fails validation becomes a [`RejectedRow`] and parsing continues. Only an
//! unreadable file aborts the whole source.

use super::record::{MovieRating, RawRating};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};

/// Rejection reason for rows without a title or rating
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// One decoded row of a rating export
pub trait SourceRow: DeserializeOwned {
    /// Human-readable source name used in logs
    const SOURCE: &'static str;

    /// `chrono` format of the date column
    const DATE_FORMAT: &'static str;

    /// Convert into raw validator input
    ///
    /// Returns `None` when the title or rating is missing.
    fn into_raw(self) -> Option<RawRating>;
}

/// IMDb ratings export row
#[derive(Debug, Deserialize)]
pub struct ImdbRow {
    #[serde(rename = "Original Title")]
    pub title: Option<String>,
    #[serde(rename = "Your Rating")]
    pub rating: Option<String>,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Date Rated")]
    pub date_rated: String,
}

impl SourceRow for ImdbRow {
    const SOURCE: &'static str = "IMDB";
    const DATE_FORMAT: &'static str = "%Y-%m-%d";

    fn into_raw(self) -> Option<RawRating> {
        Some(RawRating {
            title: self.title?,
            rating: self.rating?,
            year: self.year,
            rated_at: self.date_rated,
            date_format: Self::DATE_FORMAT.to_string(),
        })
    }
}

/// Kinopoisk ratings export row
#[derive(Debug, Deserialize)]
pub struct KinopoiskRow {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Rating_10")]
    pub rating: Option<String>,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Date")]
    pub date: String,
}

impl SourceRow for KinopoiskRow {
    const SOURCE: &'static str = "Kinopoisk";
    const DATE_FORMAT: &'static str = "%Y-%m-%d";

    fn into_raw(self) -> Option<RawRating> {
        Some(RawRating {
            title: self.name?,
            rating: self.rating?,
            year: self.year,
            rated_at: self.date,
            date_format: Self::DATE_FORMAT.to_string(),
        })
    }
}

/// A row that could not become a rating, kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based line number in the source file
    pub line: u64,
    /// `(header, value)` pairs as read
    pub fields: Vec<(String, String)>,
    pub reason: String,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {{", self.line)?;
        for (i, (header, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", header, value)?;
        }
        write!(f, "}}")
    }
}

/// Result of parsing one export file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub records: Vec<MovieRating>,
    pub rejected: Vec<RejectedRow>,
}

/// Parse one export file
///
/// Returns `None` (and logs) when the path is unset, the file does not exist,
/// or the file cannot be read as CSV.
pub fn parse_source<R: SourceRow>(path: Option<&Path>) -> Option<ParseOutcome> {
    let Some(path) = path else {
        warn!("{} path is not set", R::SOURCE);
        return None;
    };

    if !path.exists() {
        error!("{} file not found: {}", R::SOURCE, path.display());
        return None;
    }

    match read_rows::<R>(path) {
        Ok(outcome) => {
            for rejected in &outcome.rejected {
                error!("[Error] {}\n[Row] {}", rejected.reason, rejected);
            }
            info!(
                "Successfully parsed {} {} ratings",
                outcome.records.len(),
                R::SOURCE
            );
            info!(
                "Unsuccessfully parsed {} {} ratings",
                outcome.rejected.len(),
                R::SOURCE
            );
            Some(outcome)
        }
        Err(e) => {
            error!("Error parsing {} file: {}", R::SOURCE, e);
            None
        }
    }
}

/// Parse an IMDb export
pub fn parse_imdb(path: Option<&Path>) -> Option<ParseOutcome> {
    parse_source::<ImdbRow>(path)
}

/// Parse a Kinopoisk export
pub fn parse_kinopoisk(path: Option<&Path>) -> Option<ParseOutcome> {
    parse_source::<KinopoiskRow>(path)
}

fn read_rows<R: SourceRow>(path: &Path) -> Result<ParseOutcome, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut outcome = ParseOutcome::default();
    for result in reader.records() {
        // Only I/O and encoding errors reach here; short rows decode per row
        let record = result?;

        match decode_row::<R>(&record, &headers) {
            Ok(rating) => outcome.records.push(rating),
            Err(reason) => outcome.rejected.push(RejectedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                fields: headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.to_string(), v.to_string()))
                    .collect(),
                reason,
            }),
        }
    }

    Ok(outcome)
}

fn decode_row<R: SourceRow>(record: &StringRecord, headers: &StringRecord) -> Result<MovieRating, String> {
    let row: R = record
        .deserialize(Some(headers))
        .map_err(|e| format!("Row decode failed: {}", e))?;
    let raw = row
        .into_raw()
        .ok_or_else(|| MISSING_REQUIRED_FIELDS.to_string())?;
    raw.validate().map_err(|e| e.to_string())
}
