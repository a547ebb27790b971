// File: src/core/commonizer.rs
use crate::core::casing::phrase_is_proper;
use crate::core::types::{PhraseToken, WordSenseKey};
use crate::error::{Result, SenseError};
use serde::{Deserialize, Serialize};

/// One raw phrase entry: a bare key or a structured token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhraseEntry {
    Key(String),
    Token {
        wordsense: String,
        #[serde(default)]
        required: bool,
    },
}

impl From<&str> for PhraseEntry {
    fn from(key: &str) -> Self {
        PhraseEntry::Key(key.to_string())
    }
}

/// The body of a phrase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhraseBody {
    Key(String),
    Entries(Vec<PhraseEntry>),
}

/// Every shape a caller may hand a phrase in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhraseInput {
    Key(String),
    Entries(Vec<PhraseEntry>),
    Record {
        phrase: PhraseBody,
        #[serde(default)]
        is_proper: Option<bool>,
    },
}

impl PhraseInput {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|_| {
            SenseError::InvalidInput(format!("unrecognized phrase shape: {value}"))
        })
    }

    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        PhraseInput::Entries(
            keys.iter()
                .map(|k| PhraseEntry::Key(k.as_ref().to_string()))
                .collect(),
        )
    }

    fn parts(&self) -> (Vec<PhraseEntry>, Option<bool>) {
        match self {
            PhraseInput::Key(key) => (vec![PhraseEntry::Key(key.clone())], None),
            PhraseInput::Entries(entries) => (entries.clone(), None),
            PhraseInput::Record { phrase, is_proper } => match phrase {
                PhraseBody::Key(key) => (vec![PhraseEntry::Key(key.clone())], *is_proper),
                PhraseBody::Entries(entries) => (entries.clone(), *is_proper),
            },
        }
    }
}

impl From<&str> for PhraseInput {
    fn from(key: &str) -> Self {
        PhraseInput::Key(key.to_string())
    }
}

/// A phrase in canonical form together with its properness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPhrase {
    pub tokens: Vec<PhraseToken>,
    pub is_proper: bool,
}

impl CommonPhrase {
    /// Surface forms of the tokens, one per token.
    pub fn surface_forms(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.key().word.clone()).collect()
    }
}

/// Turns heterogeneous phrase entries into a canonical token list.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyCommonizer;

impl KeyCommonizer {
    pub fn new() -> Self {
        Self
    }

    pub fn call(&self, entries: &[PhraseEntry]) -> Result<Vec<PhraseToken>> {
        if entries.is_empty() {
            return Err(SenseError::InvalidInput("phrase has no entries".into()));
        }
        let mut tokens = entries
            .iter()
            .map(|entry| match entry {
                PhraseEntry::Key(raw) => Ok(PhraseToken::new(WordSenseKey::parse(raw)?, false)),
                PhraseEntry::Token {
                    wordsense,
                    required,
                } => Ok(PhraseToken::new(WordSenseKey::parse(wordsense)?, *required)),
            })
            .collect::<Result<Vec<_>>>()?;
        // A lone token cannot be dropped.
        if let [only] = tokens.as_mut_slice() {
            only.required = true;
        }
        Ok(tokens)
    }

    /// Canonicalizes a whole input, computing properness unless the caller
    /// supplied it.
    pub fn commonize(&self, input: &PhraseInput) -> Result<CommonPhrase> {
        let (entries, is_proper) = input.parts();
        let tokens = self.call(&entries)?;
        let is_proper = match is_proper {
            Some(flag) => flag,
            None => {
                let words: Vec<&str> = tokens.iter().map(|t| t.key().word.as_str()).collect();
                phrase_is_proper(&words)
            }
        };
        Ok(CommonPhrase { tokens, is_proper })
    }
}
