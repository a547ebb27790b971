// File: src/filters.rs
//! Reductions applied to each tier of synonym candidates, in a fixed order.

use crate::config::SynonymOptions;
use crate::core::commonizer::CommonPhrase;
use crate::core::types::{GenericSense, SynonymMatch};
use std::collections::HashSet;

/// Drops candidates that repeat an input word, an already kept word or an
/// earlier candidate of the same batch, ignoring case. Expects candidates
/// sorted by descending score so the best case variant survives.
pub fn reduce_multicase(
    candidates: Vec<SynonymMatch>,
    input_words: &HashSet<String>,
    kept: &HashSet<String>,
) -> Vec<SynonymMatch> {
    let mut seen: HashSet<String> = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            let folded = candidate.word.to_lowercase();
            !input_words.contains(&folded) && !kept.contains(&folded) && seen.insert(folded)
        })
        .collect()
}

/// Keeps candidates whose generic sense equals the input's, when the input
/// has a single known one.
pub fn match_input_sense(
    candidates: Vec<SynonymMatch>,
    input_sense: Option<GenericSense>,
) -> Vec<SynonymMatch> {
    match input_sense {
        None | Some(GenericSense::Unknown) => candidates,
        Some(sense) => candidates
            .into_iter()
            .filter(|candidate| GenericSense::of(&candidate.sense) == sense)
            .collect(),
    }
}

/// Whether `candidate` is a compound that starts or ends with `word`.
pub fn is_compound_of(candidate: &str, word: &str) -> bool {
    let segments: Vec<&str> = candidate.split(' ').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return false;
    }
    let word = word.to_lowercase();
    segments.first().is_some_and(|s| s.to_lowercase() == word)
        || segments.last().is_some_and(|s| s.to_lowercase() == word)
}

/// Drops compounds built on the input word (`super foo` for `foo`).
pub fn reduce_compound_nouns(candidates: Vec<SynonymMatch>, input_word: &str) -> Vec<SynonymMatch> {
    candidates
        .into_iter()
        .filter(|candidate| !is_compound_of(&candidate.word, input_word))
        .collect()
}

pub fn min_word_len(candidates: Vec<SynonymMatch>, min_len: usize) -> Vec<SynonymMatch> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.word.chars().count() >= min_len)
        .collect()
}

/// The bound is inclusive.
pub fn min_score(candidates: Vec<SynonymMatch>, min_score: f32) -> Vec<SynonymMatch> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.score >= min_score)
        .collect()
}

/// The filter chain configured for one phrase and one set of options.
#[derive(Debug, Clone)]
pub struct FilterChain {
    multicase_inputs: Option<HashSet<String>>,
    input_sense: Option<GenericSense>,
    compound_word: Option<String>,
    min_word_len: Option<usize>,
    min_score: Option<f32>,
}

impl FilterChain {
    pub fn new(phrase: &CommonPhrase, options: &SynonymOptions) -> Self {
        let multicase_inputs = options.reduce_multicase.then(|| {
            let mut words: HashSet<String> = phrase
                .tokens
                .iter()
                .flat_map(|t| t.key().words().map(str::to_lowercase))
                .collect();
            words.insert(phrase.surface_forms().join(" ").to_lowercase());
            words
        });

        let input_sense = if options.match_input_sense {
            let senses: HashSet<GenericSense> = phrase
                .tokens
                .iter()
                .map(|t| t.key().generic_sense())
                .collect();
            match senses.into_iter().collect::<Vec<_>>().as_slice() {
                [only] => Some(*only),
                _ => None,
            }
        } else {
            None
        };

        let compound_word = match phrase.tokens.as_slice() {
            [only] if options.reduce_compound_nouns && only.key().is_single_word() => {
                Some(only.key().word.clone())
            }
            _ => None,
        };

        Self {
            multicase_inputs,
            input_sense,
            compound_word,
            min_word_len: options.min_word_len,
            min_score: options.min_score,
        }
    }

    /// Runs the chain over one tier. `kept` holds the case-folded words
    /// already in the result.
    pub fn apply(&self, candidates: Vec<SynonymMatch>, kept: &HashSet<String>) -> Vec<SynonymMatch> {
        let mut candidates = match &self.multicase_inputs {
            Some(inputs) => reduce_multicase(candidates, inputs, kept),
            None => candidates,
        };
        candidates = match_input_sense(candidates, self.input_sense);
        if let Some(word) = &self.compound_word {
            candidates = reduce_compound_nouns(candidates, word);
        }
        if let Some(len) = self.min_word_len {
            candidates = min_word_len(candidates, len);
        }
        if let Some(score) = self.min_score {
            candidates = min_score(candidates, score);
        }
        candidates
    }
}
