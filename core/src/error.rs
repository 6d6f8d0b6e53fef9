//! Error types shared by every lexicon crate.
//!
//! Covers invalid caller input, configuration problems, connection and query
//! failures, schema setup failures and use-after-close.

use thiserror::Error;

/// Boxed error source carried by connection and query failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or using a lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// A batch was empty or contained an unusable item. No query was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend could not be opened or reached.
    #[error("connection failure: {0}")]
    Connection(#[source] BoxError),

    /// A single SQL statement failed.
    #[error("query failure: {0}")]
    Query(#[source] BoxError),

    /// Schema setup or verification failed.
    #[error("migration failure: {0}")]
    Migration(String),

    /// The live `lexicon.word` collation differs from the one the backend
    /// is configured to honor.
    #[error("collation mismatch on lexicon.word: expected {expected}, found {found}")]
    CollationMismatch {
        /// Collation required by the configured dialect.
        expected: String,
        /// Collation reported by the database.
        found: String,
    },

    /// The lexicon was closed; it cannot be used again.
    #[error("lexicon is closed")]
    Closed,

    /// The backend kind is known but was not compiled into this build.
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LexiconError {
    /// Wraps any error as a [`LexiconError::Query`].
    pub fn query(err: impl Into<BoxError>) -> Self {
        Self::Query(err.into())
    }

    /// Wraps any error as a [`LexiconError::Connection`].
    pub fn connection(err: impl Into<BoxError>) -> Self {
        Self::Connection(err.into())
    }

    /// Returns `true` for failures that leave the store unusable, such as
    /// connection or schema errors.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::Migration(_)
                | Self::CollationMismatch { .. }
                | Self::Closed
                | Self::UnsupportedBackend(_)
                | Self::InvalidConfig(_)
        )
    }
}

/// Convenience alias for results with [`LexiconError`].
pub type Result<T> = std::result::Result<T, LexiconError>;
