//! Error types for irr.

use thiserror::Error;

/// Result type for irr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for irr operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A rater used a label that is not in the vocabulary.
    #[error("unknown label `{label}` for item `{item}` (not in the vocabulary)")]
    UnknownLabel {
        /// The offending label token, already lower-cased and trimmed.
        label: String,
        /// Canonical key of the item the label was attached to.
        item: String,
    },

    /// Input that leaves the coefficient undefined (division by zero).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create an unknown-label error.
    pub fn unknown_label(label: impl Into<String>, item: impl Into<String>) -> Self {
        Error::UnknownLabel {
            label: label.into(),
            item: item.into(),
        }
    }

    /// Create a degenerate-input error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateInput(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
