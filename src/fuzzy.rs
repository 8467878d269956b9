//! Fuzzy scoring of symbol names against a search pattern
//!
//! A scorer returns `None` for "no match". A match carries a rank (higher is
//! better) and the character offsets of `text` that matched.

use std::cell::RefCell;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

/// Rank and matched character offsets of a successful fuzzy match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FuzzyScore {
    pub value: i32,
    pub matches: Vec<usize>,
}

impl FuzzyScore {
    pub fn new(value: i32, matches: Vec<usize>) -> Self {
        Self { value, matches }
    }
}

/// Pure scoring function: `score(pattern, text)`
pub trait Scorer {
    fn score(&self, pattern: &str, text: &str) -> Option<FuzzyScore>;
}

impl<F> Scorer for F
where
    F: Fn(&str, &str) -> Option<FuzzyScore>,
{
    fn score(&self, pattern: &str, text: &str) -> Option<FuzzyScore> {
        self(pattern, text)
    }
}

/// Which built-in scorer to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Subsequence,
    Nucleo,
}

impl ScorerKind {
    pub fn build(self) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Subsequence => Box::new(SubsequenceScorer),
            ScorerKind::Nucleo => Box::new(NucleoScorer::new()),
        }
    }
}

/// Case-insensitive in-order subsequence match.
///
/// Consecutive matches and word-start matches score higher. An empty
/// pattern matches everything with a zero rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsequenceScorer;

impl Scorer for SubsequenceScorer {
    fn score(&self, pattern: &str, text: &str) -> Option<FuzzyScore> {
        let pattern_chars: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();

        if pattern_chars.is_empty() {
            return Some(FuzzyScore::default());
        }

        let mut pattern_idx = 0;
        let mut value = 0;
        let mut matches = Vec::with_capacity(pattern_chars.len());
        let mut prev_matched = false;
        let mut prev_was_separator = true; // Start of string counts as separator

        for (i, tc) in text.chars().enumerate() {
            let is_separator = matches!(tc, ' ' | '_' | '-' | '.' | ':');

            // Lowercasing may expand one char (`İ` becomes `i` plus a dot)
            for (j, lower) in tc.to_lowercase().enumerate() {
                if pattern_idx < pattern_chars.len() && lower == pattern_chars[pattern_idx] {
                    value += 1;

                    if prev_matched {
                        value += 2;
                    }
                    if j == 0 && prev_was_separator {
                        value += 3;
                    }
                    if j == 0 && i == 0 {
                        value += 5;
                    }

                    if matches.last() != Some(&i) {
                        matches.push(i);
                    }
                    pattern_idx += 1;
                    prev_matched = true;
                } else {
                    prev_matched = false;
                }
            }

            prev_was_separator = is_separator;
        }

        // All pattern chars must be found
        if pattern_idx == pattern_chars.len() {
            Some(FuzzyScore::new(value, matches))
        } else {
            None
        }
    }
}

/// Scorer backed by `nucleo-matcher` (smart case, smart normalization)
pub struct NucleoScorer {
    matcher: RefCell<Matcher>,
}

impl NucleoScorer {
    pub fn new() -> Self {
        Self {
            matcher: RefCell::new(Matcher::new(Config::DEFAULT)),
        }
    }
}

impl Default for NucleoScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for NucleoScorer {
    fn score(&self, pattern: &str, text: &str) -> Option<FuzzyScore> {
        let pattern = Pattern::parse(pattern, CaseMatching::Smart, Normalization::Smart);
        let mut buf = Vec::new();
        let haystack = Utf32Str::new(text, &mut buf);
        let mut indices = Vec::new();

        let value = {
            let mut matcher = self.matcher.borrow_mut();
            pattern.indices(haystack, &mut matcher, &mut indices)?
        };

        indices.sort_unstable();
        indices.dedup();

        Some(FuzzyScore::new(
            i32::try_from(value).unwrap_or(i32::MAX),
            indices.into_iter().map(|i| i as usize).collect(),
        ))
    }
}
