//! Match engine
//!
//! Classifies search result candidates against a target rating.
//!
//! Per candidate, in scan order:
//! - title alike (or equal) **and** year equal: exact match, scanning stops
//! - title alike **xor** year equal: kept as a pretender
//! - neither: discarded
//!
//! Selection is first-match-wins, not best-match.

use super::candidate::CandidateMatch;
use crate::ratings::MovieRating;

/// Similarity (0-100) a title must strictly exceed to count as alike
pub const DEFAULT_ALIKE_THRESHOLD: f64 = 70.0;

/// Outcome of matching one rating against a search result
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision<R> {
    /// Candidate to rate without asking
    Exact(CandidateMatch<R>),
    /// Candidates that matched on title or year but not both, in scan order
    Ambiguous(Vec<CandidateMatch<R>>),
    /// Nothing resembling the target
    NoMatch,
}

/// Per-candidate comparison against the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub titles_equal: bool,
    pub title_similarity: f64,
    pub titles_alike: bool,
    pub years_equal: bool,
}

impl Comparison {
    fn is_exact(&self) -> bool {
        (self.titles_equal && self.years_equal) || (self.titles_alike && self.years_equal)
    }

    fn is_pretender(&self) -> bool {
        self.titles_alike != self.years_equal
    }
}

/// Match engine
pub struct MatchEngine {
    alike_threshold: f64,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            alike_threshold: DEFAULT_ALIKE_THRESHOLD,
        }
    }

    pub fn with_threshold(alike_threshold: f64) -> Self {
        Self { alike_threshold }
    }

    /// Compare one candidate with the target
    pub fn compare<R>(&self, target: &MovieRating, candidate: &CandidateMatch<R>) -> Comparison {
        let found_title = candidate.found_title.as_deref();
        let title_similarity = title_similarity(found_title, target.title());

        Comparison {
            titles_equal: found_title == Some(target.title()),
            title_similarity,
            titles_alike: title_similarity > self.alike_threshold,
            years_equal: candidate.found_year.as_deref() == Some(target.year()),
        }
    }

    /// Classify candidates against the target
    pub fn classify<R>(
        &self,
        target: &MovieRating,
        candidates: Vec<CandidateMatch<R>>,
    ) -> MatchDecision<R> {
        let mut pretenders = Vec::new();

        for candidate in candidates {
            let cmp = self.compare(target, &candidate);

            tracing::debug!(
                found = %candidate,
                similarity = cmp.title_similarity,
                years_equal = cmp.years_equal,
                "Comparing candidate"
            );

            if !cmp.titles_equal && cmp.titles_alike {
                tracing::debug!(
                    imported = %target.title(),
                    on_site = %candidate.found_title.as_deref().unwrap_or(""),
                    "Alike titles found ({:.0}/100)",
                    cmp.title_similarity
                );
            }

            if cmp.is_exact() {
                tracing::debug!(found = %candidate, "Exact match found");
                return MatchDecision::Exact(candidate);
            }

            if cmp.is_pretender() {
                pretenders.push(candidate);
            }
        }

        if pretenders.is_empty() {
            MatchDecision::NoMatch
        } else {
            MatchDecision::Ambiguous(pretenders)
        }
    }
}

/// Normalized Levenshtein similarity (0-100) of the lowercased titles
///
/// A missing found title has similarity 0.
pub fn title_similarity(found_title: Option<&str>, target_title: &str) -> f64 {
    match found_title {
        Some(found) => {
            strsim::normalized_levenshtein(&found.to_lowercase(), &target_title.to_lowercase())
                * 100.0
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::RawRating;

    fn target(title: &str, year: &str) -> MovieRating {
        RawRating {
            title: title.to_string(),
            rating: "8".to_string(),
            year: year.to_string(),
            rated_at: "2021-01-01".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
        .validate()
        .unwrap()
    }

    fn candidate(id: u32, title: &str, year: &str) -> CandidateMatch<u32> {
        CandidateMatch::new(id, Some(title.to_string()), Some(year.to_string()))
    }

    #[test]
    fn test_exact_title_and_year() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![candidate(1, "Inception", "2010")],
        );

        assert_eq!(decision, MatchDecision::Exact(candidate(1, "Inception", "2010")));
    }

    #[test]
    fn test_fuzzy_title_with_equal_year_is_exact() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![candidate(1, "Inceptio", "2010")],
        );

        assert_eq!(decision, MatchDecision::Exact(candidate(1, "Inceptio", "2010")));
    }

    #[test]
    fn test_equal_title_with_other_year_is_ambiguous() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![candidate(1, "Inception", "2012")],
        );

        assert_eq!(
            decision,
            MatchDecision::Ambiguous(vec![candidate(1, "Inception", "2012")])
        );
    }

    #[test]
    fn test_unrelated_candidate_is_no_match() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![candidate(1, "Unrelated Movie", "1999")],
        );

        assert_eq!(decision, MatchDecision::NoMatch);
    }

    #[test]
    fn test_year_only_match_is_pretender() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![candidate(1, "Toy Story 3", "2010")],
        );

        assert!(matches!(decision, MatchDecision::Ambiguous(ref p) if p.len() == 1));
    }

    #[test]
    fn test_first_exact_wins_over_later_better_match() {
        let decision = MatchEngine::new().classify(
            &target("Inception", "2010"),
            vec![
                candidate(1, "Inception 2", "2012"),
                candidate(2, "Inceptions", "2010"),
                candidate(3, "Inception", "2010"),
            ],
        );

        assert_eq!(decision, MatchDecision::Exact(candidate(2, "Inceptions", "2010")));
    }

    #[test]
    fn test_pretenders_keep_scan_order() {
        let decision = MatchEngine::new().classify(
            &target("Heat", "1995"),
            vec![
                candidate(1, "Heat", "1986"),
                candidate(2, "Casino", "1999"),
                candidate(3, "Jumanji", "1995"),
            ],
        );

        match decision {
            MatchDecision::Ambiguous(pretenders) => {
                let ids: Vec<u32> = pretenders.iter().map(|c| c.row).collect();
                assert_eq!(ids, vec![1, 3]);
            }
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_title_equality_is_case_sensitive_but_similarity_is_not() {
        let engine = MatchEngine::new();
        let cmp = engine.compare(&target("Inception", "2010"), &candidate(1, "INCEPTION", "2012"));

        assert!(!cmp.titles_equal);
        assert!(cmp.titles_alike);
        assert_eq!(cmp.title_similarity, 100.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // "abcdefghij" vs "abcdefgxyz": 3 substitutions over 10 chars = 70.0
        let engine = MatchEngine::new();
        let cmp = engine.compare(&target("abcdefghij", "2000"), &candidate(1, "abcdefgxyz", "2001"));

        assert!((cmp.title_similarity - 70.0).abs() < 1e-9);
        assert!(!cmp.titles_alike);
        assert_eq!(
            engine.classify(&target("abcdefghij", "2000"), vec![candidate(1, "abcdefgxyz", "2001")]),
            MatchDecision::NoMatch
        );
    }

    #[test]
    fn test_unparsed_candidate_is_discarded() {
        let unparsed: CandidateMatch<u32> = CandidateMatch::new(1, None, None);

        let decision = MatchEngine::new().classify(&target("Inception", "2010"), vec![unparsed]);

        assert_eq!(decision, MatchDecision::NoMatch);
    }

    #[test]
    fn test_empty_candidates_is_no_match() {
        let decision: MatchDecision<u32> =
            MatchEngine::new().classify(&target("Inception", "2010"), Vec::new());

        assert_eq!(decision, MatchDecision::NoMatch);
    }

    #[test]
    fn test_similarity_of_missing_title_is_zero() {
        assert_eq!(title_similarity(None, "Inception"), 0.0);
    }
}
