// File: src/core/ordering.rs
//! Total ordering of candidate variants against the phrase they render, and
//! the grouping of the ordered list into priority tiers.

use crate::core::casing::{is_capitalized, title_case};
use crate::core::types::{CandidateVariant, PhraseToken, RankedVariant, COMMON_NOUN_SENSE};
use std::cmp::Ordering;

fn surface_words(tokens: &[PhraseToken]) -> Vec<&str> {
    tokens.iter().flat_map(|t| t.key().words()).collect()
}

fn joined_count(tokens: &[PhraseToken]) -> usize {
    tokens.iter().filter(|t| t.is_joined).count()
}

fn is_common_noun(tokens: &[PhraseToken]) -> bool {
    matches!(tokens, [only] if only.key().sense == COMMON_NOUN_SENSE)
}

/// `true` sorts before `false`.
fn prefer(a: bool, b: bool) -> Ordering {
    b.cmp(&a)
}

/// The comparator strategy for one phrase: its source tokens and properness.
#[derive(Debug, Clone)]
pub struct VariantOrder {
    source_words: Vec<String>,
    source_spaced: String,
    source_folded: String,
    source_underscored: Vec<char>,
    source_starts_upper: bool,
    is_proper: bool,
}

impl VariantOrder {
    pub fn new(source: &[PhraseToken], is_proper: bool) -> Self {
        let source_words: Vec<String> = surface_words(source)
            .into_iter()
            .map(str::to_string)
            .collect();
        let source_spaced = source_words.join(" ");
        Self {
            source_folded: source_spaced.to_lowercase(),
            source_underscored: source_words.join("_").chars().collect(),
            source_starts_upper: source_spaced.chars().next().is_some_and(char::is_uppercase),
            source_words,
            source_spaced,
            is_proper,
        }
    }

    /// Sense rank only orders single-token candidates. Multi-token candidates take
    /// the rank of an uncased, non-common-noun single token so the ordering
    /// stays total when both shapes share a joined-token count.
    fn sense_rank(&self, tokens: &[PhraseToken]) -> (bool, bool) {
        if self.is_proper {
            return (true, true);
        }
        match tokens {
            [only] => (
                only.key().sense == COMMON_NOUN_SENSE,
                !is_capitalized(&only.key().word),
            ),
            _ => (false, true),
        }
    }

    /// Position-by-position agreement with the source's underscore-joined form.
    fn char_matches<'a>(&'a self, words: &'a [&str]) -> impl Iterator<Item = bool> + 'a {
        let candidate: Vec<char> = words.join("_").chars().collect();
        let len = candidate.len().max(self.source_underscored.len());
        (0..len).map(move |i| {
            matches!(
                (candidate.get(i), self.source_underscored.get(i)),
                (Some(c), Some(s)) if c == s
            )
        })
    }

    pub fn compare(&self, a: &[PhraseToken], b: &[PhraseToken]) -> Ordering {
        prefer(!a.is_empty(), !b.is_empty())
            .then_with(|| joined_count(b).cmp(&joined_count(a)))
            .then_with(|| {
                let (a_noun, a_plain) = self.sense_rank(a);
                let (b_noun, b_plain) = self.sense_rank(b);
                prefer(a_noun, b_noun).then_with(|| prefer(a_plain, b_plain))
            })
            .then_with(|| self.compare_surface(&surface_words(a), &surface_words(b)))
    }

    fn compare_surface(&self, a: &[&str], b: &[&str]) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let exact = |words: &[&str]| words.iter().copied().eq(self.source_words.iter().map(String::as_str));
        let folded = |words: &[&str]| words.join(" ").to_lowercase() == self.source_folded;
        let titled = |words: &[&str]| {
            self.source_starts_upper && title_case(&words.join(" ")) == self.source_spaced
        };
        let long_enough = |words: &[&str]| words.len() >= self.source_words.len();

        prefer(exact(a), exact(b))
            .then_with(|| prefer(folded(a), folded(b)))
            .then_with(|| prefer(titled(a), titled(b)))
            .then_with(|| prefer(long_enough(a), long_enough(b)))
            .then_with(|| {
                self.char_matches(a)
                    .zip(self.char_matches(b))
                    .find(|(x, y)| x != y)
                    .map_or(Ordering::Equal, |(x, y)| prefer(x, y))
            })
    }

    /// Stable sort; equal candidates keep emission order.
    pub fn sort(&self, candidates: &mut [CandidateVariant]) {
        candidates.sort_by(|a, b| self.compare(a, b));
    }

    /// Whether `b` belongs in a later tier than `a`, its predecessor.
    fn starts_new_tier(&self, a: &[PhraseToken], b: &[PhraseToken]) -> bool {
        if joined_count(a) != joined_count(b) {
            return true;
        }
        let mut a_words = surface_words(a);
        let mut b_words = surface_words(b);
        a_words.sort_unstable();
        b_words.sort_unstable();
        if a_words != b_words {
            return true;
        }
        !self.is_proper && a.len() == 1 && b.len() == 1 && is_common_noun(a) != is_common_noun(b)
    }

    /// Assigns contiguous tiers starting at 1 to an already sorted list.
    pub fn assign_tiers(&self, sorted: Vec<CandidateVariant>) -> Vec<RankedVariant> {
        let mut ranked: Vec<RankedVariant> = Vec::with_capacity(sorted.len());
        for candidate in sorted {
            let priority = match ranked.last() {
                None => 1,
                Some(previous) if self.starts_new_tier(&previous.key, &candidate) => {
                    previous.priority + 1
                }
                Some(previous) => previous.priority,
            };
            ranked.push(RankedVariant {
                key: candidate,
                priority,
            });
        }
        ranked
    }
}
