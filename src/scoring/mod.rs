// src/scoring/mod.rs
// Per-message classification: category keyword tables and the scoring function.

pub mod categories;
pub mod scorer;

pub use scorer::score_message;
