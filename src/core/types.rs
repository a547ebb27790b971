// src/core/types.rs
use crate::error::{Result, SenseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the surface form and the sense tag in a raw key.
pub const SENSE_SEPARATOR: char = '|';
/// Separator between the words of a multi-word surface form in a raw key.
pub const WORD_SEPARATOR: char = '_';

/// Noun-like tags, named-entity categories included.
pub const NOUN_TAGS: &[&str] = &[
    "PROPN",
    "NOUN",
    "n",
    "NUM",
    "PERSON",
    "NORP",
    "FACILITY",
    "ORG",
    "GPE",
    "LOC",
    "PRODUCT",
    "EVENT",
    "LANGUAGE",
    "WORK_OF_ART",
];
pub const ADJECTIVE_TAGS: &[&str] = &["ADJ", "ADV", "a"];
pub const VERB_TAGS: &[&str] = &["VERB", "v"];

pub const COMMON_NOUN_SENSE: &str = "NOUN";
pub const PROPER_NOUN_SENSE: &str = "PROPN";
/// Tag the tagger gives tokens it could not classify.
pub const UNTAGGED_SENSE: &str = "X";

/// Coarse grouping of sense tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericSense {
    Noun,
    Adjective,
    Verb,
    Unknown,
}

impl GenericSense {
    pub fn of(sense: &str) -> Self {
        if ADJECTIVE_TAGS.contains(&sense) {
            GenericSense::Adjective
        } else if VERB_TAGS.contains(&sense) {
            GenericSense::Verb
        } else if NOUN_TAGS.contains(&sense) {
            GenericSense::Noun
        } else {
            GenericSense::Unknown
        }
    }
}

pub fn is_adjective_sense(sense: &str) -> bool {
    ADJECTIVE_TAGS.contains(&sense)
}

/// A (surface form, sense tag) pair identifying one vocabulary entry.
///
/// The surface form is held with spaces between its words; the raw key
/// form joins them with [`WORD_SEPARATOR`], e.g. `big_apple|NOUN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordSenseKey {
    pub word: String,
    pub sense: String,
}

impl WordSenseKey {
    pub fn new(word: impl Into<String>, sense: impl Into<String>) -> Self {
        let word: String = word.into();
        Self {
            word: word.replace(WORD_SEPARATOR, " "),
            sense: sense.into(),
        }
    }

    /// Splits a raw key at its last sense separator.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.rsplit_once(SENSE_SEPARATOR) {
            Some((word, sense)) if !word.is_empty() && !sense.is_empty() => {
                Ok(Self::new(word, sense))
            }
            _ => Err(SenseError::InvalidKey(raw.to_string())),
        }
    }

    /// The raw vocabulary form of this key.
    pub fn to_key(&self) -> String {
        format!(
            "{}{}{}",
            self.word.replace(' ', &WORD_SEPARATOR.to_string()),
            SENSE_SEPARATOR,
            self.sense
        )
    }

    /// The individual words of the surface form.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.word.split(' ').filter(|w| !w.is_empty())
    }

    pub fn is_single_word(&self) -> bool {
        self.words().count() <= 1
    }

    pub fn generic_sense(&self) -> GenericSense {
        GenericSense::of(&self.sense)
    }
}

impl fmt::Display for WordSenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

/// Outcome of looking a token up in the vocabulary.
///
/// `Unresolved` keeps the key the caller asked for so ranking can still
/// reason about its surface words, but it must never reach the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    Resolved(WordSenseKey),
    Unresolved(WordSenseKey),
}

impl Resolution {
    pub fn key(&self) -> &WordSenseKey {
        match self {
            Resolution::Resolved(key) | Resolution::Unresolved(key) => key,
        }
    }

    pub fn resolved(&self) -> Option<&WordSenseKey> {
        match self {
            Resolution::Resolved(key) => Some(key),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// One token of a phrase, as handed to and produced by variation resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhraseToken {
    pub wordsense: Resolution,
    /// A required token may not be dropped or replaced by a sampled key.
    pub required: bool,
    /// Set on tokens produced by collapsing two or more tokens into one compound.
    pub is_joined: bool,
}

impl PhraseToken {
    pub fn new(key: WordSenseKey, required: bool) -> Self {
        Self {
            wordsense: Resolution::Resolved(key),
            required,
            is_joined: false,
        }
    }

    pub fn joined(key: WordSenseKey) -> Self {
        Self {
            wordsense: Resolution::Resolved(key),
            required: true,
            is_joined: true,
        }
    }

    pub fn key(&self) -> &WordSenseKey {
        self.wordsense.key()
    }
}

/// One full alternative rendering of an input phrase.
pub type CandidateVariant = Vec<PhraseToken>;

/// A candidate together with its priority tier; tier 1 is the best match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedVariant {
    pub key: CandidateVariant,
    pub priority: usize,
}

impl RankedVariant {
    /// The vocabulary keys of this variant, or `None` if any token is unresolved.
    pub fn resolved_keys(&self) -> Option<Vec<WordSenseKey>> {
        self.key
            .iter()
            .map(|token| token.wordsense.resolved().cloned())
            .collect()
    }
}

/// One ranked synonym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymMatch {
    pub word: String,
    pub sense: String,
    pub score: f32,
}

impl SynonymMatch {
    pub fn key(&self) -> WordSenseKey {
        WordSenseKey::new(self.word.clone(), self.sense.clone())
    }
}
