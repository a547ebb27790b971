use crate::config::{EngineConfig, SimilarityOptions, SynonymOptions};
use crate::core::casing::case_variant_if_present;
use crate::core::catalog::SenseCatalog;
use crate::core::commonizer::{KeyCommonizer, PhraseInput};
use crate::core::index::VectorSpaceIndex;
use crate::core::types::{RankedVariant, SynonymMatch, WordSenseKey};
use crate::core::variations::{VariationOptions, VariationResolver};
use crate::error::Result;
use crate::similarity::SimilarityEngine;
use crate::synonyms::SynonymEngine;
use tracing::info;

/// The resolution engine: an immutable index and its sense catalog, built
/// once at startup and shared read-only by every request.
pub struct SenseEngine<I: VectorSpaceIndex> {
    index: I,
    catalog: SenseCatalog,
    config: EngineConfig,
}

impl<I: VectorSpaceIndex> SenseEngine<I> {
    pub fn new(index: I) -> Self {
        Self::with_config(index, EngineConfig::default())
    }

    pub fn with_config(index: I, config: EngineConfig) -> Self {
        let catalog = SenseCatalog::build(&index);
        info!(keys = index.len(), "sense engine ready");
        Self {
            index,
            catalog,
            config,
        }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn catalog(&self) -> &SenseCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolver(&self) -> VariationResolver<'_> {
        VariationResolver::new(&self.catalog)
            .with_sampling(self.config.sample_attempts, self.config.sample_batch_size)
    }

    /// Ranked variants of a phrase, for callers that want the raw ranking.
    pub fn variations(
        &self,
        phrase: &PhraseInput,
        options: &VariationOptions,
    ) -> Result<Vec<RankedVariant>> {
        let phrase = KeyCommonizer::new().commonize(phrase)?;
        let options = VariationOptions {
            phrase_is_proper: options.phrase_is_proper.or(Some(phrase.is_proper)),
            ..options.clone()
        };
        Ok(self.resolver().call(&phrase.tokens, &options))
    }

    pub fn resolve_synonyms(
        &self,
        phrase: &PhraseInput,
        options: &SynonymOptions,
    ) -> Result<Vec<SynonymMatch>> {
        SynonymEngine::new(&self.index, self.resolver())
            .with_cache_limit(self.config.neighbor_cache_limit)
            .call(phrase, options)
    }

    pub fn compute_similarity(
        &self,
        a: &PhraseInput,
        b: &PhraseInput,
        options: &SimilarityOptions,
    ) -> Result<f32> {
        SimilarityEngine::new(&self.index, self.resolver())
            .with_variant_limit(self.config.similarity_variant_limit)
            .call(a, b, options)
    }

    pub fn resolve_synonyms_batch(
        &self,
        phrases: &[PhraseInput],
        options: &SynonymOptions,
    ) -> Result<Vec<Vec<SynonymMatch>>> {
        phrases
            .iter()
            .map(|phrase| self.resolve_synonyms(phrase, options))
            .collect()
    }

    pub fn compute_similarity_batch(
        &self,
        pairs: &[(PhraseInput, PhraseInput)],
        options: &SimilarityOptions,
    ) -> Result<Vec<f32>> {
        pairs
            .iter()
            .map(|(a, b)| self.compute_similarity(a, b, options))
            .collect()
    }

    /// The first case rendering of `key` present in the index.
    pub fn lookup(&self, key: &WordSenseKey) -> Option<WordSenseKey> {
        case_variant_if_present(&self.index, key)
    }

    /// Runs a synonym query for the configured probe key.
    pub fn healthcheck(&self) -> Result<Vec<SynonymMatch>> {
        let probe = PhraseInput::Key(self.config.healthcheck_key.clone());
        self.resolve_synonyms(&probe, &SynonymOptions::default())
    }
}
