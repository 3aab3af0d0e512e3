//! Error types for texanno.

use thiserror::Error;

/// Result type for texanno operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for texanno operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Export window cannot be resolved because there are no annotations.
    #[error("Cannot resolve export window: annotation set is empty")]
    EmptyAnnotationSet,

    /// System and reference tag sequences cover different segmentations.
    #[error("Length mismatch: system has {system} positions, reference has {reference}")]
    LengthMismatch {
        /// Number of positions in the system sequence.
        system: usize,
        /// Number of positions in the reference sequence.
        reference: usize,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tokenizer failed to load or encode.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by the core record types.
    #[error(transparent)]
    Core(#[from] texanno_core::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a tokenizer error.
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Error::Tokenizer(msg.into())
    }
}
