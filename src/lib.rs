// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod filters;
pub mod persistence;
pub mod similarity;
pub mod synonyms;

pub use crate::config::{EngineConfig, SimilarityOptions, SynonymOptions};
pub use crate::core::commonizer::PhraseInput;
pub use crate::core::engine::SenseEngine;
pub use crate::core::index::{InMemoryIndex, VectorSpaceIndex};
pub use crate::core::types::{SynonymMatch, WordSenseKey};
pub use crate::error::{IndexError, SenseError};
