//! Error types for the example-data crate.

use thiserror::Error;

/// Errors that can occur while generating synthetic records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Articles need at least one author to cycle through.
    #[error("no users available to author generated articles")]
    NoAuthors,

    /// A configured range is empty or inverted.
    #[error("invalid {setting} range: {start}..={end}")]
    InvalidRange {
        /// Name of the offending configuration field.
        setting: &'static str,
        /// Lower bound of the range.
        start: usize,
        /// Upper bound of the range.
        end: usize,
    },
}
