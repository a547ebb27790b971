// --- File: src/core/catalog.rs
use crate::core::index::VectorSpaceIndex;
use crate::core::types::{
    WordSenseKey, ADJECTIVE_TAGS, COMMON_NOUN_SENSE, NOUN_TAGS, PROPER_NOUN_SENSE,
};
use std::collections::HashMap;
use tracing::info;

/// Lowercases a surface form and turns word separators into spaces.
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase().replace(crate::core::types::WORD_SEPARATOR, " ")
}

/// A case-insensitive map from surface word to every sense-tagged key that
/// spells it. Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SenseCatalog {
    buckets: HashMap<String, Vec<WordSenseKey>>,
    /// The full vocabulary in index order, used for fallback sampling.
    all_keys: Vec<WordSenseKey>,
}

impl SenseCatalog {
    /// O(vocabulary size).
    pub fn build<I: VectorSpaceIndex + ?Sized>(index: &I) -> Self {
        let mut buckets: HashMap<String, Vec<WordSenseKey>> = HashMap::new();
        let mut all_keys = Vec::with_capacity(index.len());
        for key in index.keys() {
            buckets
                .entry(normalize_word(&key.word))
                .or_default()
                .push(key.clone());
            all_keys.push(key);
        }
        info!(
            words = buckets.len(),
            keys = all_keys.len(),
            "sense catalog built"
        );
        Self { buckets, all_keys }
    }

    pub fn all_keys(&self) -> &[WordSenseKey] {
        &self.all_keys
    }

    pub fn bucket(&self, word: &str) -> &[WordSenseKey] {
        self.buckets
            .get(&normalize_word(word))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Noun-like senses of `word`: other senses in catalog order, then proper
    /// nouns, then common nouns.
    pub fn noun_based_senses(&self, word: &str) -> Vec<WordSenseKey> {
        self.noun_based_senses_in(word, NOUN_TAGS)
    }

    pub fn noun_based_senses_in(&self, word: &str, whitelist: &[&str]) -> Vec<WordSenseKey> {
        let mut other = Vec::new();
        let mut proper = Vec::new();
        let mut common = Vec::new();
        for key in self.bucket(word) {
            if !whitelist.contains(&key.sense.as_str()) {
                continue;
            }
            match key.sense.as_str() {
                COMMON_NOUN_SENSE => common.push(key.clone()),
                PROPER_NOUN_SENSE => proper.push(key.clone()),
                _ => other.push(key.clone()),
            }
        }
        other.extend(proper);
        other.extend(common);
        other
    }

    pub fn adjective_based_senses(&self, word: &str) -> Vec<WordSenseKey> {
        self.adjective_based_senses_in(word, ADJECTIVE_TAGS)
    }

    pub fn adjective_based_senses_in(
        &self,
        word: &str,
        whitelist: &[&str],
    ) -> Vec<WordSenseKey> {
        self.bucket(word)
            .iter()
            .filter(|key| whitelist.contains(&key.sense.as_str()))
            .cloned()
            .collect()
    }
}
