//! Disambiguation escalator
//!
//! When the match engine reports several pretenders, the choice is deferred
//! to a [`DecisionProvider`]: an interactive terminal prompt in the binary,
//! or a scripted provider in tests.
//!
//! Accepted answers are a 1-based option number or `q` to skip. Anything else
//! is asked again, without a retry limit. A provider whose input is closed
//! counts as `q`.

use super::candidate::CandidateMatch;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Context shown to the decision-maker
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePrompt<'a> {
    /// Target being rated, e.g. `"Heat (1995)"`
    pub label: &'a str,
    /// Candidate descriptions, in option order (option `n` is `options[n - 1]`)
    pub options: Vec<String>,
}

/// Source of answers for disambiguation prompts
pub trait DecisionProvider {
    /// Return the next raw answer, or `None` once no more input is available
    fn answer(&mut self, prompt: &ChoicePrompt<'_>) -> Option<String>;
}

impl<D: DecisionProvider + ?Sized> DecisionProvider for &mut D {
    fn answer(&mut self, prompt: &ChoicePrompt<'_>) -> Option<String> {
        (**self).answer(prompt)
    }
}

/// Reads answers from stdin
///
/// The read blocks the calling thread. Drive the sync run on a
/// `current_thread` runtime; on a multi-thread runtime worker it would stall
/// other tasks.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl DecisionProvider for TerminalPrompt {
    fn answer(&mut self, _prompt: &ChoicePrompt<'_>) -> Option<String> {
        print!("Enter the number of the correct option or 'q' to exit: ");
        if let Err(e) = io::stdout().flush() {
            tracing::warn!("Failed to flush prompt: {}", e);
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::error!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

/// Replays a fixed list of answers; runs dry after the last one
#[derive(Debug, Default, Clone)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
    prompts: Vec<(String, Vec<String>)>,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt received, as `(label, options)`
    pub fn prompts(&self) -> &[(String, Vec<String>)] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn answer(&mut self, prompt: &ChoicePrompt<'_>) -> Option<String> {
        self.prompts
            .push((prompt.label.to_string(), prompt.options.clone()));
        self.answers.pop_front()
    }
}

/// Interpretation of one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the pretender list
    Pick(usize),
    Quit,
    Invalid,
}

/// Interpret a raw answer against `count` options
pub fn interpret_answer(answer: &str, count: usize) -> Choice {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if !answer.is_empty() && answer.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=count).contains(&n) {
                return Choice::Pick(n - 1);
            }
        }
    }
    Choice::Invalid
}

/// Escalates ambiguous matches to a decision provider
pub struct Escalator<D> {
    provider: D,
}

impl<D: DecisionProvider> Escalator<D> {
    pub fn new(provider: D) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &D {
        &self.provider
    }

    pub fn into_provider(self) -> D {
        self.provider
    }

    /// Ask which pretender (if any) is the target
    ///
    /// Returns the chosen candidate itself, or `None` for an empty list or a
    /// skip.
    pub fn resolve<R>(
        &mut self,
        label: &str,
        mut pretenders: Vec<CandidateMatch<R>>,
    ) -> Option<CandidateMatch<R>> {
        if pretenders.is_empty() {
            return None;
        }

        let prompt = ChoicePrompt {
            label,
            options: pretenders.iter().map(ToString::to_string).collect(),
        };

        tracing::info!("(Choice) Rating the film: {}", label);
        for (i, option) in prompt.options.iter().enumerate() {
            tracing::info!("{}. {}", i + 1, option);
        }

        loop {
            let Some(answer) = self.provider.answer(&prompt) else {
                tracing::warn!(target_film = %label, "No more input, skipping");
                return None;
            };

            match interpret_answer(&answer, pretenders.len()) {
                Choice::Pick(index) => return Some(pretenders.swap_remove(index)),
                Choice::Quit => {
                    tracing::info!(target_film = %label, "Skipped by user");
                    return None;
                }
                Choice::Invalid => {
                    tracing::debug!(answer = %answer, "Invalid choice, asking again");
                }
            }
        }
    }
}
