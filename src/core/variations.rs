// File: src/core/variations.rs
use crate::core::casing::phrase_is_proper;
use crate::core::catalog::SenseCatalog;
use crate::core::ordering::VariantOrder;
use crate::core::types::{
    is_adjective_sense, CandidateVariant, PhraseToken, RankedVariant, Resolution, WordSenseKey,
    UNTAGGED_SENSE,
};
use itertools::Itertools;
use rand::seq::SliceRandom;
use tracing::{debug, trace, warn};

pub const DEFAULT_SAMPLE_ATTEMPTS: usize = 20;
pub const DEFAULT_SAMPLE_BATCH_SIZE: usize = 50;

/// Per-call switches for [`VariationResolver::call`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariationOptions {
    /// Try collapsing the phrase, and its last two tokens, into compound keys.
    pub attempt_phrase_join: bool,
    /// Mark compound tokens as joined so they outrank their parts.
    pub flag_joined_variations: bool,
    /// Replace optional tokens missing from the vocabulary with a sampled key
    /// of the same sense.
    pub random_sample_for_unknown: bool,
    /// Skip the properness heuristic and use this flag instead.
    pub phrase_is_proper: Option<bool>,
    pub return_only_top_priority: bool,
    /// Hard cap on the number of variants returned, applied last.
    pub limit: Option<usize>,
}

/// Generates, orders and tiers alternative renderings of a phrase.
#[derive(Debug, Clone, Copy)]
pub struct VariationResolver<'a> {
    catalog: &'a SenseCatalog,
    sample_attempts: usize,
    sample_batch_size: usize,
}

impl<'a> VariationResolver<'a> {
    pub fn new(catalog: &'a SenseCatalog) -> Self {
        Self {
            catalog,
            sample_attempts: DEFAULT_SAMPLE_ATTEMPTS,
            sample_batch_size: DEFAULT_SAMPLE_BATCH_SIZE,
        }
    }

    pub fn with_sampling(mut self, attempts: usize, batch_size: usize) -> Self {
        self.sample_attempts = attempts;
        self.sample_batch_size = batch_size.max(1);
        self
    }

    pub fn call(&self, k: &[PhraseToken], options: &VariationOptions) -> Vec<RankedVariant> {
        let is_proper = options.phrase_is_proper.unwrap_or_else(|| {
            let words: Vec<&str> = k.iter().map(|t| t.key().word.as_str()).collect();
            phrase_is_proper(&words)
        });

        let mut candidates: Vec<CandidateVariant> = Vec::new();
        if k.len() >= 2 && options.attempt_phrase_join {
            candidates.extend(self.whole_phrase_joined(k, options));
        }
        if k.len() > 2 && options.attempt_phrase_join {
            if let Some(reduced) = self.tail_joined(k, options) {
                candidates.extend(self.sense_substitutions(&reduced, options));
            }
        }
        candidates.extend(self.sense_substitutions(k, options));

        let order = VariantOrder::new(k, is_proper);
        order.sort(&mut candidates);
        let mut ranked = order.assign_tiers(candidates);

        if options.return_only_top_priority {
            ranked.retain(|variant| variant.priority == 1);
        }
        if let Some(limit) = options.limit {
            ranked.truncate(limit);
        }
        debug!(
            tokens = k.len(),
            is_proper,
            variants = ranked.len(),
            tiers = ranked.last().map_or(0, |v| v.priority),
            "resolved phrase variations"
        );
        ranked
    }

    fn joined_token(&self, key: WordSenseKey, options: &VariationOptions) -> PhraseToken {
        let mut token = PhraseToken::joined(key);
        token.is_joined = options.flag_joined_variations;
        token
    }

    /// The whole phrase collapsed into one compound noun key.
    fn whole_phrase_joined(
        &self,
        k: &[PhraseToken],
        options: &VariationOptions,
    ) -> Vec<CandidateVariant> {
        let joined = k.iter().map(|t| t.key().word.as_str()).join(" ");
        self.catalog
            .noun_based_senses(&joined)
            .into_iter()
            .map(|key| vec![self.joined_token(key, options)])
            .collect()
    }

    /// The phrase with its last two tokens collapsed into a compound noun, if
    /// the vocabulary has one.
    fn tail_joined(&self, k: &[PhraseToken], options: &VariationOptions) -> Option<Vec<PhraseToken>> {
        let (head, tail) = k.split_at(k.len().checked_sub(2)?);
        let compound = tail.iter().map(|t| t.key().word.as_str()).join(" ");
        let key = self.catalog.noun_based_senses(&compound).into_iter().next()?;
        trace!(compound = %key, "joined trailing tokens");
        let mut reduced = head.to_vec();
        reduced.push(self.joined_token(key, options));
        Some(reduced)
    }

    /// Every combination of per-token alternative senses.
    fn sense_substitutions(
        &self,
        tokens: &[PhraseToken],
        options: &VariationOptions,
    ) -> Vec<CandidateVariant> {
        let alternatives: Vec<Vec<PhraseToken>> = tokens
            .iter()
            .map(|token| self.alternatives_for(token, options))
            .collect();
        match alternatives.as_slice() {
            [] => Vec::new(),
            [only] => only.iter().map(|token| vec![token.clone()]).collect(),
            _ => alternatives
                .iter()
                .multi_cartesian_product()
                .map(|combination| combination.into_iter().cloned().collect())
                .collect(),
        }
    }

    fn alternatives_for(&self, token: &PhraseToken, options: &VariationOptions) -> Vec<PhraseToken> {
        let key = token.key();
        let senses = if is_adjective_sense(&key.sense) {
            self.catalog.adjective_based_senses(&key.word)
        } else {
            self.catalog.noun_based_senses(&key.word)
        };
        let substitute = |wordsense| PhraseToken {
            wordsense,
            required: token.required,
            is_joined: token.is_joined,
        };
        if !senses.is_empty() {
            return senses
                .into_iter()
                .map(|s| substitute(Resolution::Resolved(s)))
                .collect();
        }
        if !options.random_sample_for_unknown {
            return Vec::new();
        }
        let fallback = if token.required {
            None
        } else {
            self.sample_matching_sense(&key.sense)
        };
        let resolution = match fallback {
            Some(sampled) => Resolution::Resolved(sampled),
            None => Resolution::Unresolved(key.clone()),
        };
        vec![substitute(resolution)]
    }

    /// A random vocabulary key carrying `sense`, drawn in bounded batches.
    /// Untagged keys are never drawn.
    fn sample_matching_sense(&self, sense: &str) -> Option<WordSenseKey> {
        let keys = self.catalog.all_keys();
        if keys.is_empty() {
            return None;
        }
        let mut rng = rand::thread_rng();
        for _ in 0..self.sample_attempts {
            let found = keys
                .choose_multiple(&mut rng, self.sample_batch_size.min(keys.len()))
                .find(|key| key.sense == sense && key.sense != UNTAGGED_SENSE);
            if let Some(key) = found {
                return Some(key.clone());
            }
        }
        warn!(
            sense,
            attempts = self.sample_attempts,
            "no vocabulary key of the required sense found"
        );
        None
    }
}
