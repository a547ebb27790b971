// File: src/config.rs
use crate::core::variations::{DEFAULT_SAMPLE_ATTEMPTS, DEFAULT_SAMPLE_BATCH_SIZE};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_SIMILARITY_VARIANT_LIMIT: usize = 25;
pub const DEFAULT_SYNONYM_COUNT: usize = 10;
pub const DEFAULT_HEALTHCHECK_KEY: &str = "plastic|NOUN";

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Top-tier variants kept per phrase when scoring similarity.
    pub similarity_variant_limit: usize,
    /// Batches drawn before giving up on a same-sense fallback key.
    pub sample_attempts: usize,
    pub sample_batch_size: usize,
    /// Overrides the index's own neighbor cache limit.
    pub neighbor_cache_limit: Option<usize>,
    pub healthcheck_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_variant_limit: DEFAULT_SIMILARITY_VARIANT_LIMIT,
            sample_attempts: DEFAULT_SAMPLE_ATTEMPTS,
            sample_batch_size: DEFAULT_SAMPLE_BATCH_SIZE,
            neighbor_cache_limit: None,
            healthcheck_key: DEFAULT_HEALTHCHECK_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Options for one similarity request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SimilarityOptions {
    pub attempt_phrase_join_for_compound_phrases: bool,
}

/// Options for one synonym request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SynonymOptions {
    pub attempt_phrase_join_for_compound_phrases: bool,
    pub reduce_multicase: bool,
    pub match_input_sense: bool,
    pub reduce_compound_nouns: bool,
    pub min_word_len: Option<usize>,
    /// Inclusive lower bound on neighbor score.
    pub min_score: Option<f32>,
    pub n: usize,
    /// Query neighbors for multi-token variants too. Expensive against a
    /// single-key neighbor cache.
    pub allow_multi_token_queries: bool,
}

impl Default for SynonymOptions {
    fn default() -> Self {
        Self {
            attempt_phrase_join_for_compound_phrases: false,
            reduce_multicase: false,
            match_input_sense: false,
            reduce_compound_nouns: false,
            min_word_len: None,
            min_score: None,
            n: DEFAULT_SYNONYM_COUNT,
            allow_multi_token_queries: false,
        }
    }
}
