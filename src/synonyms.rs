// File: src/synonyms.rs
use crate::config::SynonymOptions;
use crate::core::casing::{case_variant_if_present, phrase_is_proper};
use crate::core::commonizer::{KeyCommonizer, PhraseInput};
use crate::core::index::VectorSpaceIndex;
use crate::core::types::{RankedVariant, SynonymMatch, WordSenseKey};
use crate::core::variations::{VariationOptions, VariationResolver};
use crate::error::Result;
use crate::filters::FilterChain;
use indexmap::map::Entry;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, trace};

const MIN_NEIGHBOR_FETCH: usize = 10;

/// Finds the nearest synonyms of a phrase, walking its variants tier by tier.
pub struct SynonymEngine<'a, I: VectorSpaceIndex + ?Sized> {
    index: &'a I,
    resolver: VariationResolver<'a>,
    commonizer: KeyCommonizer,
    cache_limit: Option<usize>,
}

impl<'a, I: VectorSpaceIndex + ?Sized> SynonymEngine<'a, I> {
    pub fn new(index: &'a I, resolver: VariationResolver<'a>) -> Self {
        Self {
            index,
            resolver,
            commonizer: KeyCommonizer::new(),
            cache_limit: index.neighbor_cache_limit(),
        }
    }

    pub fn with_cache_limit(mut self, limit: Option<usize>) -> Self {
        if limit.is_some() {
            self.cache_limit = limit;
        }
        self
    }

    /// Neighbors requested per query: twice the result size, at least ten,
    /// never more than the cache serves.
    pub fn fetch_count(&self, n: usize) -> usize {
        let wanted = (n * 2).max(MIN_NEIGHBOR_FETCH);
        self.cache_limit.map_or(wanted, |limit| wanted.min(limit))
    }

    pub fn call(&self, input: &PhraseInput, options: &SynonymOptions) -> Result<Vec<SynonymMatch>> {
        let phrase = self.commonizer.commonize(input)?;
        let n = options.n;
        let mut results: Vec<SynonymMatch> = Vec::with_capacity(n);
        if n == 0 {
            return Ok(results);
        }

        let variants = self.resolver.call(
            &phrase.tokens,
            &VariationOptions {
                attempt_phrase_join: options.attempt_phrase_join_for_compound_phrases,
                flag_joined_variations: true,
                random_sample_for_unknown: false,
                phrase_is_proper: Some(phrase.is_proper),
                return_only_top_priority: false,
                limit: None,
            },
        );

        let chain = FilterChain::new(&phrase, options);
        let fetch = self.fetch_count(n);
        let mut kept_words: HashSet<String> = HashSet::new();
        let mut kept_folded: HashSet<String> = HashSet::new();

        for (priority, tier) in &variants.iter().chunk_by(|v| v.priority) {
            let remaining = n - results.len();
            let mut working: IndexMap<String, SynonymMatch> = IndexMap::new();
            for variant in tier {
                let Some(keys) = self.queryable_keys(variant, options) else {
                    continue;
                };
                for (key, score) in self.neighbors(&keys, fetch)? {
                    if phrase_is_proper(&[key.word.as_str()]) != phrase.is_proper {
                        continue;
                    }
                    merge(&mut working, key, score);
                }
            }

            let mut candidates: Vec<SynonymMatch> = working
                .into_values()
                .filter(|candidate| !kept_words.contains(&candidate.word))
                .collect();
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
            let filtered = chain.apply(candidates, &kept_folded);
            let supplied = filtered.len();
            for candidate in filtered.into_iter().take(remaining) {
                kept_words.insert(candidate.word.clone());
                kept_folded.insert(candidate.word.to_lowercase());
                results.push(candidate);
            }
            trace!(priority, supplied, collected = results.len(), "synonym tier processed");

            if results.len() >= n || supplied >= remaining {
                break;
            }
        }
        debug!(results = results.len(), variants = variants.len(), "synonyms resolved");
        Ok(results)
    }

    /// The vocabulary keys to query for one variant, if it may be queried.
    fn queryable_keys(
        &self,
        variant: &RankedVariant,
        options: &SynonymOptions,
    ) -> Option<Vec<WordSenseKey>> {
        if variant.key.is_empty() || (variant.key.len() > 1 && !options.allow_multi_token_queries) {
            return None;
        }
        variant
            .resolved_keys()?
            .iter()
            .map(|key| case_variant_if_present(self.index, key))
            .collect()
    }

    fn neighbors(&self, keys: &[WordSenseKey], count: usize) -> Result<Vec<(WordSenseKey, f32)>> {
        match self.index.nearest_neighbors(keys, count) {
            Ok(neighbors) => Ok(neighbors),
            Err(error) if error.is_incomparable() => {
                debug!(%error, "skipping variant the index cannot query");
                Ok(Vec::new())
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Keeps the higher score when a word is seen twice within a tier.
fn merge(working: &mut IndexMap<String, SynonymMatch>, key: WordSenseKey, score: f32) {
    let candidate = SynonymMatch {
        word: key.word,
        sense: key.sense,
        score,
    };
    match working.entry(candidate.word.clone()) {
        Entry::Occupied(mut existing) => {
            if score > existing.get().score {
                existing.insert(candidate);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::SenseCatalog;
    use crate::core::index::InMemoryIndex;

    fn index() -> InMemoryIndex {
        InMemoryIndex::from_entries([
            ("foo|NOUN", vec![1.0, 0.0, 0.0]),
            ("super_foo|NOUN", vec![0.99, 0.01, 0.0]),
            ("bar|NOUN", vec![0.9, 0.1, 0.0]),
            ("baz|NOUN", vec![0.8, 0.2, 0.0]),
            ("qux|ADJ", vec![0.7, 0.3, 0.0]),
            ("Foo_Corp|ORG", vec![0.95, 0.0, 0.05]),
            ("far|NOUN", vec![0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn it_bounds_the_fetch_count() {
        let index = index();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        assert_eq!(engine.fetch_count(2), 10);
        assert_eq!(engine.fetch_count(8), 16);
        let engine = engine.with_cache_limit(Some(12));
        assert_eq!(engine.fetch_count(8), 12);
    }

    #[test]
    fn it_returns_neighbors_by_descending_score() {
        let index = index();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        let options = SynonymOptions {
            n: 3,
            ..Default::default()
        };
        let result = engine.call(&"foo|NOUN".into(), &options).unwrap();
        let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
        // Foo Corp is proper and the input is not.
        assert_eq!(words, vec!["super foo", "bar", "baz"]);
    }

    #[test]
    fn it_suppresses_compounds_of_the_input() {
        let index = index();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        let options = SynonymOptions {
            reduce_compound_nouns: true,
            match_input_sense: true,
            n: 3,
            ..Default::default()
        };
        let result = engine.call(&"foo|NOUN".into(), &options).unwrap();
        let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(words, vec!["bar", "baz", "far"]);
    }

    #[test]
    fn it_returns_nothing_for_unknown_phrases() {
        let index = index();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        let result = engine.call(&"nothing|NOUN".into(), &Default::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn it_lets_later_tiers_return_words_an_earlier_tier_filtered_out() {
        let index = InMemoryIndex::from_entries([
            ("apple|NOUN", vec![1.0, 0.0, 0.0]),
            ("Apple|ORG", vec![0.0, 1.0, 0.0]),
            ("pear|NOUN", vec![0.3, 1.0, 0.0]),
        ])
        .unwrap();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));

        for reduce_multicase in [false, true] {
            let options = SynonymOptions {
                min_score: Some(0.5),
                reduce_multicase,
                ..Default::default()
            };
            let result = engine.call(&"apple|NOUN".into(), &options).unwrap();
            let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
            assert_eq!(words, vec!["pear"], "reduce_multicase = {reduce_multicase}");
            assert!(result[0].score > 0.95);
        }
    }

    #[test]
    fn it_keeps_the_best_scoring_case_variant_within_a_tier() {
        let index = InMemoryIndex::from_entries([
            ("New_York|GPE", vec![1.0, 0.0, 0.0, 0.0]),
            ("New_York|NOUN", vec![0.0, 1.0, 0.0, 0.0]),
            ("Bar|ORG", vec![0.5, 0.0, 0.866, 0.0]),
            ("BAR|ORG", vec![0.0, 0.9, 0.0, 0.436]),
        ])
        .unwrap();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        let options = SynonymOptions {
            reduce_multicase: true,
            ..Default::default()
        };
        let result = engine.call(&"New_York|GPE".into(), &options).unwrap();
        let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(words, vec!["BAR"]);
        assert!(result[0].score > 0.89);
    }

    #[test]
    fn it_queries_multi_token_variants_only_when_allowed() {
        let index = InMemoryIndex::from_entries([
            ("big|ADJ", vec![1.0, 0.0]),
            ("apple|NOUN", vec![0.0, 1.0]),
            ("fruit|NOUN", vec![0.6, 0.8]),
        ])
        .unwrap();
        let catalog = SenseCatalog::build(&index);
        let engine = SynonymEngine::new(&index, VariationResolver::new(&catalog));
        let phrase = PhraseInput::from_keys(&["big|ADJ", "apple|NOUN"]);

        let skipped = engine.call(&phrase, &SynonymOptions::default()).unwrap();
        assert!(skipped.is_empty());

        let options = SynonymOptions {
            allow_multi_token_queries: true,
            ..Default::default()
        };
        let result = engine.call(&phrase, &options).unwrap();
        let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(words, vec!["fruit"]);
    }

    #[test]
    fn it_keeps_the_best_score_per_word() {
        let mut working = IndexMap::new();
        merge(&mut working, WordSenseKey::new("bar", "NOUN"), 0.4);
        merge(&mut working, WordSenseKey::new("bar", "VERB"), 0.6);
        merge(&mut working, WordSenseKey::new("bar", "ADJ"), 0.5);
        assert_eq!(working.len(), 1);
        assert_eq!(working["bar"].sense, "VERB");
        assert_eq!(working["bar"].score, 0.6);
    }
}
