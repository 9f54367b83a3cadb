//! Search result candidates
//!
//! A candidate pairs a site-specific result row with the title and year
//! parsed from its caption. Both are `None` when the caption does not follow
//! the `"Title (Year)"` pattern.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TITLE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+) \((\d{4})\)").expect("valid title/year regex"));

/// One search result row being evaluated against a target rating
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch<R> {
    /// Site-specific handle used for submission
    pub row: R,
    pub found_title: Option<String>,
    pub found_year: Option<String>,
}

impl<R> CandidateMatch<R> {
    pub fn new(row: R, found_title: Option<String>, found_year: Option<String>) -> Self {
        Self {
            row,
            found_title,
            found_year,
        }
    }

    /// Build a candidate from a `"Title (Year)"` caption
    pub fn from_caption(row: R, caption: &str) -> Self {
        let (found_title, found_year) = parse_title_year(caption);
        Self::new(row, found_title, found_year)
    }
}

impl<R> fmt::Display for CandidateMatch<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.found_title.as_deref().unwrap_or("?"),
            self.found_year.as_deref().unwrap_or("?")
        )
    }
}

/// Split a `"Title (Year)"` caption
///
/// Matches `(.+) \((\d{4})\)` anywhere in the caption, so `"Heat (1995) (Director's Cut)"`
/// yields `("Heat", "1995")`. Parse failure logs an error and returns
/// `(None, None)`.
pub fn parse_title_year(text: &str) -> (Option<String>, Option<String>) {
    match TITLE_YEAR_RE.captures(text) {
        Some(caps) => {
            let title = caps[1].trim();
            if title.is_empty() {
                tracing::error!("Failed to parse movie card name: {}", text);
                return (None, None);
            }
            (Some(title.to_string()), Some(caps[2].to_string()))
        }
        None => {
            tracing::error!("Failed to parse movie card name: {}", text);
            (None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_caption() {
        assert_eq!(
            parse_title_year("Inception (2010)"),
            (Some("Inception".to_string()), Some("2010".to_string()))
        );
    }

    #[test]
    fn test_parse_title_containing_parentheses() {
        assert_eq!(
            parse_title_year("  Birdman (or The Unexpected Virtue of Ignorance) (2014)"),
            (
                Some("Birdman (or The Unexpected Virtue of Ignorance)".to_string()),
                Some("2014".to_string())
            )
        );
    }

    #[test]
    fn test_parse_failure_returns_nones() {
        for caption in ["Inception", "Inception 2010", "(2010)", ""] {
            assert_eq!(parse_title_year(caption), (None, None), "caption {:?}", caption);
        }
    }

    #[test]
    fn test_candidate_display() {
        let parsed = CandidateMatch::from_caption((), "Heat (1995)");
        let unparsed = CandidateMatch::from_caption((), "Heat");

        assert_eq!(parsed.to_string(), "Heat (1995)");
        assert_eq!(unparsed.to_string(), "? (?)");
    }
}
