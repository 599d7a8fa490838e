//! Error types for the challenge layer.

use mimicry_features::FeatureError;
use thiserror::Error;

/// Result type for challenge operations.
pub type ChallengeResult<T> = Result<T, ChallengeError>;

/// Errors that can occur while managing or verifying challenges.
#[derive(Debug, Error)]
pub enum ChallengeError {
    /// A field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidRecord {
        /// Field name.
        field: &'static str,
        /// Error message.
        message: String,
    },

    /// No challenge with this id.
    #[error("challenge {id} not found")]
    NotFound {
        /// The missing id.
        id: u64,
    },

    /// The record store could not complete an operation.
    #[error("record store error: {message}")]
    Store {
        /// Error message.
        message: String,
    },

    /// Feature extraction or comparison failed.
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChallengeError {
    /// Creates a validation error for one field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            field,
            message: message.into(),
        }
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ChallengeError::InvalidRecord { .. } => "C001",
            ChallengeError::NotFound { .. } => "C002",
            ChallengeError::Store { .. } => "C003",
            ChallengeError::Feature(_) => "C004",
            ChallengeError::Io(_) => "C005",
        }
    }

    /// The most specific code available: the wrapped `F0xx` code for feature
    /// errors, [`code`](Self::code) otherwise.
    pub fn root_code(&self) -> &'static str {
        match self {
            ChallengeError::Feature(inner) => inner.code(),
            other => other.code(),
        }
    }
}
