// src/extractors/mod.rs

pub mod validated;

pub use validated::{ValidatedBody, ValidatedPath, ValidatedQuery};
