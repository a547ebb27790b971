// File: src/core/casing.rs
//! Casing and properness heuristics over surface forms.

use crate::core::index::VectorSpaceIndex;
use crate::core::types::WordSenseKey;
use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| {
        Regex::new(r"[\p{P}<>|^~+=`■]").expect("punctuation pattern is a valid regex")
    })
}

/// Replaces punctuation with spaces.
pub fn remove_punctuation(text: &str) -> String {
    punctuation().replace_all(text, " ").into_owned()
}

/// A phrase is proper when any of its words carries case that lowercasing
/// would remove.
pub fn phrase_is_proper<S: AsRef<str>>(words: &[S]) -> bool {
    let joined = words
        .iter()
        .flat_map(|w| w.as_ref().split(' '))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let stripped = remove_punctuation(&joined);
    stripped != stripped.to_lowercase()
}

/// Title-cases text the way a word processor would: the first cased letter
/// after any uncased character is upper-cased, every other letter lower-cased.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && !previous_cased {
            result.extend(c.to_uppercase());
        } else if cased {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        previous_cased = cased;
    }
    result
}

/// Upper-cases only the first character.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// All cased characters are upper case, and there is at least one.
pub fn is_all_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Starts with an upper-case letter or is written entirely in capitals.
pub fn is_capitalized(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase) || is_all_upper(text)
}

/// The first case rendering of `key` the index knows about: the key itself,
/// then lower-cased, fully upper-cased, title-cased and first-letter-capitalized.
pub fn case_variant_if_present<I>(index: &I, key: &WordSenseKey) -> Option<WordSenseKey>
where
    I: VectorSpaceIndex + ?Sized,
{
    let upper = WordSenseKey::parse(&key.to_key().to_uppercase()).ok();
    let candidates = [
        Some(key.clone()),
        Some(WordSenseKey::new(key.word.to_lowercase(), key.sense.clone())),
        upper,
        Some(WordSenseKey::new(title_case(&key.word), key.sense.clone())),
        Some(WordSenseKey::new(capitalize_first(&key.word), key.sense.clone())),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| index.exists(candidate))
}
