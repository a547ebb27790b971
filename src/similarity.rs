// File: src/similarity.rs
use crate::config::{SimilarityOptions, DEFAULT_SIMILARITY_VARIANT_LIMIT};
use crate::core::commonizer::{CommonPhrase, KeyCommonizer, PhraseInput};
use crate::core::index::VectorSpaceIndex;
use crate::core::types::RankedVariant;
use crate::core::variations::{VariationOptions, VariationResolver};
use crate::error::Result;
use tracing::debug;

/// Rounds to three decimal places.
pub fn round3(score: f32) -> f32 {
    ((f64::from(score) * 1000.0).round() / 1000.0) as f32
}

/// Scores two phrases by their best pair of top-tier variants.
pub struct SimilarityEngine<'a, I: VectorSpaceIndex + ?Sized> {
    index: &'a I,
    resolver: VariationResolver<'a>,
    commonizer: KeyCommonizer,
    variant_limit: usize,
}

impl<'a, I: VectorSpaceIndex + ?Sized> SimilarityEngine<'a, I> {
    pub fn new(index: &'a I, resolver: VariationResolver<'a>) -> Self {
        Self {
            index,
            resolver,
            commonizer: KeyCommonizer::new(),
            variant_limit: DEFAULT_SIMILARITY_VARIANT_LIMIT,
        }
    }

    pub fn with_variant_limit(mut self, limit: usize) -> Self {
        self.variant_limit = limit;
        self
    }

    pub fn call(
        &self,
        a: &PhraseInput,
        b: &PhraseInput,
        options: &SimilarityOptions,
    ) -> Result<f32> {
        let a = self.commonizer.commonize(a)?;
        let b = self.commonizer.commonize(b)?;
        let a_variants = self.top_variants(&a, options);
        let b_variants = self.top_variants(&b, options);

        let mut best = 0.0_f32;
        for a_variant in &a_variants {
            for b_variant in &b_variants {
                let score = self.score_pair(a_variant, b_variant)?;
                if score > best {
                    best = score;
                }
            }
        }
        Ok(round3(best))
    }

    /// Tier-1 variants, capped at the variant limit.
    pub fn top_variants(
        &self,
        phrase: &CommonPhrase,
        options: &SimilarityOptions,
    ) -> Vec<RankedVariant> {
        self.resolver.call(
            &phrase.tokens,
            &VariationOptions {
                attempt_phrase_join: options.attempt_phrase_join_for_compound_phrases,
                flag_joined_variations: true,
                random_sample_for_unknown: true,
                phrase_is_proper: Some(phrase.is_proper),
                return_only_top_priority: true,
                limit: Some(self.variant_limit),
            },
        )
    }

    fn score_pair(&self, a: &RankedVariant, b: &RankedVariant) -> Result<f32> {
        let (Some(a_keys), Some(b_keys)) = (a.resolved_keys(), b.resolved_keys()) else {
            return Ok(0.0);
        };
        match self.index.pairwise_similarity(&a_keys, &b_keys) {
            Ok(score) => {
                debug!(?a_keys, ?b_keys, score, "similarity comparing");
                Ok(score)
            }
            Err(error) if error.is_incomparable() => {
                debug!(%error, "incomparable variants scored as 0");
                Ok(0.0)
            }
            Err(error) => Err(error.into()),
        }
    }
}
