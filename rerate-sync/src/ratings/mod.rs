//! Ratings ingestion pipeline
//!
//! Source parsers → validator → merger, producing one canonical,
//! deduplicated list of [`MovieRating`]s.

pub mod merger;
pub mod record;
pub mod sources;
pub mod table;

pub use merger::join_ratings;
pub use record::{MergeKey, MovieRating, RawRating, ValidationError};
pub use sources::{
    parse_imdb, parse_kinopoisk, parse_source, ParseOutcome, RejectedRow, SourceRow,
    MISSING_REQUIRED_FIELDS,
};

use std::path::Path;
use tracing::{info, warn};

/// Canonical ratings plus everything that was rejected on the way
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub ratings: Vec<MovieRating>,
    pub rejected: Vec<RejectedRow>,
    /// Number of sources that could be read
    pub sources_loaded: usize,
}

/// Parse both exports and merge them
///
/// An unavailable source simply contributes nothing; with no readable
/// source the result is empty.
pub fn load_ratings(imdb_path: Option<&Path>, kinopoisk_path: Option<&Path>) -> IngestReport {
    let outcomes: Vec<ParseOutcome> = [parse_imdb(imdb_path), parse_kinopoisk(kinopoisk_path)]
        .into_iter()
        .flatten()
        .collect();

    let sources_loaded = outcomes.len();
    let mut lists = Vec::with_capacity(outcomes.len());
    let mut rejected = Vec::new();
    for outcome in outcomes {
        lists.push(outcome.records);
        rejected.extend(outcome.rejected);
    }

    let lengths: Vec<usize> = lists.iter().map(Vec::len).collect();
    let total: usize = lengths.iter().sum();
    let ratings = join_ratings(&lists);

    if lists.len() > 1 {
        info!(
            "Total length before merging: {} = {}",
            lengths
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(" + "),
            total
        );
        info!(
            "Total length after merging: {} ({} duplicates dropped)",
            ratings.len(),
            total - ratings.len()
        );
    } else if sources_loaded == 0 {
        warn!("No ratings source could be read");
    }

    IngestReport {
        ratings,
        rejected,
        sources_loaded,
    }
}

/// Grid table of ratings with a leading index column
pub fn ratings_table(ratings: &[MovieRating]) -> String {
    let rows: Vec<Vec<String>> = ratings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                i.to_string(),
                r.title().to_string(),
                r.year().to_string(),
                r.rating().to_string(),
                r.rated_at().format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    table::render_grid(&["", "Title", "Year", "Rating", "Rated At"], &rows)
}

/// Print ratings to stdout as a table
pub fn print_ratings(ratings: &[MovieRating]) {
    info!("Total ratings: {}", ratings.len());

    if ratings.is_empty() {
        warn!("No ratings to display");
        return;
    }

    println!("\n{}", ratings_table(ratings));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratings_table_row_format() {
        let rating = RawRating {
            title: "Heat".to_string(),
            rating: "8".to_string(),
            year: "1995".to_string(),
            rated_at: "2020-01-02".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
        .validate()
        .unwrap();

        let table = ratings_table(&[rating]);

        assert!(table.contains("| 0 | Heat  | 1995 | 8      | 2020-01-02 |"), "{}", table);
    }

    #[test]
    fn test_no_sources_gives_empty_report() {
        let report = load_ratings(None, None);

        assert!(report.ratings.is_empty());
        assert!(report.rejected.is_empty());
        assert_eq!(report.sources_loaded, 0);
    }
}
