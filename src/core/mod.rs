// src/core/mod.rs

pub mod casing;
pub mod catalog;
pub mod commonizer;
pub mod engine;
pub mod index;
pub mod ordering;
pub mod types;
pub mod variations;
