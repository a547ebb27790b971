// File: src/core/index.rs
use crate::core::types::WordSenseKey;
use crate::error::{IndexError, Result, SenseError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The immutable vocabulary of word-sense vectors that resolution runs against.
///
/// Implementations must be safe to share between request threads; nothing
/// here mutates the vocabulary.
pub trait VectorSpaceIndex: Send + Sync {
    fn exists(&self, key: &WordSenseKey) -> bool;

    /// Every key in the vocabulary, in a stable order.
    fn keys(&self) -> Box<dyn Iterator<Item = WordSenseKey> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn split(&self, raw: &str) -> Result<WordSenseKey> {
        WordSenseKey::parse(raw)
    }

    fn join(&self, word: &str, sense: &str) -> String {
        WordSenseKey::new(word, sense).to_key()
    }

    /// Nearest keys to the given keys, best first, excluding the query keys.
    fn nearest_neighbors(
        &self,
        keys: &[WordSenseKey],
        count: usize,
    ) -> Result<Vec<(WordSenseKey, f32)>, IndexError>;

    fn pairwise_similarity(
        &self,
        a: &[WordSenseKey],
        b: &[WordSenseKey],
    ) -> Result<f32, IndexError>;

    /// Upper bound on neighbors the index can serve from its cache, if any.
    fn neighbor_cache_limit(&self) -> Option<usize> {
        None
    }
}

/// A vocabulary held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryIndex {
    keys: Vec<WordSenseKey>,
    vectors: Vec<Vec<f32>>,
    #[serde(skip)]
    positions: HashMap<WordSenseKey, usize>,
    cache_limit: Option<usize>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Vec<f32>)>,
    {
        let mut index = Self::new();
        for (raw, vector) in entries {
            index.add(WordSenseKey::parse(raw.as_ref())?, vector)?;
        }
        Ok(index)
    }

    /// Adds or replaces a key. All vectors must share one dimension.
    pub fn add(&mut self, key: WordSenseKey, vector: Vec<f32>) -> Result<()> {
        if let Some(first) = self.vectors.first() {
            if first.len() != vector.len() {
                return Err(SenseError::Index(IndexError::Incompatible(format!(
                    "{key} has {} dimensions, index has {}",
                    vector.len(),
                    first.len()
                ))));
            }
        }
        match self.positions.get(&key) {
            Some(&position) => self.vectors[position] = vector,
            None => {
                self.positions.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.vectors.push(vector);
            }
        }
        Ok(())
    }

    pub fn with_cache_limit(mut self, limit: usize) -> Self {
        self.cache_limit = Some(limit);
        self
    }

    pub fn vector(&self, key: &WordSenseKey) -> Option<&[f32]> {
        self.positions.get(key).map(|&p| self.vectors[p].as_slice())
    }

    /// Rebuilds the lookup table after deserialization.
    pub(crate) fn reindex(&mut self) {
        self.positions = self
            .keys
            .iter()
            .enumerate()
            .map(|(position, key)| (key.clone(), position))
            .collect();
    }

    fn mean_vector(&self, keys: &[WordSenseKey]) -> Result<Vec<f32>, IndexError> {
        if keys.is_empty() {
            return Err(IndexError::Incompatible("empty key list".into()));
        }
        let mut mean: Vec<f32> = Vec::new();
        for key in keys {
            let vector = self
                .vector(key)
                .ok_or_else(|| IndexError::UnknownKey(key.to_key()))?;
            if mean.is_empty() {
                mean = vector.to_vec();
            } else {
                for (m, v) in mean.iter_mut().zip(vector) {
                    *m += v;
                }
            }
        }
        let n = keys.len() as f32;
        mean.iter_mut().for_each(|m| *m /= n);
        Ok(mean)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> Result<f32, IndexError> {
    if a.len() != b.len() {
        return Err(IndexError::Incompatible(format!(
            "dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

impl VectorSpaceIndex for InMemoryIndex {
    fn exists(&self, key: &WordSenseKey) -> bool {
        self.positions.contains_key(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = WordSenseKey> + '_> {
        Box::new(self.keys.iter().cloned())
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn nearest_neighbors(
        &self,
        keys: &[WordSenseKey],
        count: usize,
    ) -> Result<Vec<(WordSenseKey, f32)>, IndexError> {
        let query = self.mean_vector(keys)?;
        let mut scored = Vec::with_capacity(self.keys.len());
        for (key, vector) in self.keys.iter().zip(&self.vectors) {
            if keys.contains(key) {
                continue;
            }
            scored.push((key.clone(), cosine(&query, vector)?));
        }
        // Stable: equal scores keep vocabulary order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(count);
        Ok(scored)
    }

    fn pairwise_similarity(
        &self,
        a: &[WordSenseKey],
        b: &[WordSenseKey],
    ) -> Result<f32, IndexError> {
        cosine(&self.mean_vector(a)?, &self.mean_vector(b)?)
    }

    fn neighbor_cache_limit(&self) -> Option<usize> {
        self.cache_limit
    }
}
