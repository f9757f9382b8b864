//! Types module
//!
//! Contains core data structures shared across the engine:
//! - `codes`: SEC codes, categories, and code-table helpers
//! - `error`: error taxonomy for fields, batches, files, and parsing

pub mod codes;
pub mod error;

pub use codes::{Category, Polarity, SecCode};
pub use error::AchError;
