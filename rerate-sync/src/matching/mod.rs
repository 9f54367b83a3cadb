//! Candidate matching
//!
//! - [`candidate`]: search result rows with parsed title/year
//! - [`engine`]: exact / ambiguous / no-match classification
//! - [`escalation`]: manual choice among ambiguous candidates

pub mod candidate;
pub mod engine;
pub mod escalation;

pub use candidate::{parse_title_year, CandidateMatch};
pub use engine::{title_similarity, Comparison, MatchDecision, MatchEngine, DEFAULT_ALIKE_THRESHOLD};
pub use escalation::{
    interpret_answer, Choice, ChoicePrompt, DecisionProvider, Escalator, ScriptedDecisions,
    TerminalPrompt,
};
