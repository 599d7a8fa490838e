//! Error types for the feature pipeline.

use thiserror::Error;

/// Result type for feature pipeline operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Errors reported at the feature pipeline boundary.
///
/// Every variant carries a human-readable reason. Extraction is deterministic,
/// so none of these are worth retrying on the same bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// The audio container could not be parsed.
    #[error("could not decode audio: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },

    /// The decoded signal holds no samples.
    #[error("decoded audio contains no samples")]
    EmptySignal,

    /// The feature stage produced no usable output.
    #[error("feature extraction failed: {message}")]
    ExtractionFailure {
        /// Why extraction failed.
        message: String,
    },

    /// A stored summary vector does not have the `[f, f, f, f, [f; 13]]` shape.
    #[error("malformed reference vector: {message}")]
    MalformedReference {
        /// What is wrong with the stored value.
        message: String,
    },

    /// Extraction exceeded the configured wall-clock limit.
    #[error("feature extraction timed out after {seconds}s")]
    Timeout {
        /// The limit that was exceeded.
        seconds: u64,
    },

    /// The pipeline configuration is unusable.
    #[error("invalid pipeline config: {message}")]
    InvalidConfig {
        /// What is wrong with the config.
        message: String,
    },
}

impl FeatureError {
    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an extraction failure.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionFailure {
            message: message.into(),
        }
    }

    /// Creates a malformed reference error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReference {
            message: message.into(),
        }
    }

    /// Creates an invalid config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns the stable error code (e.g., "F001").
    pub fn code(&self) -> &'static str {
        match self {
            FeatureError::Decode { .. } => "F001",
            FeatureError::EmptySignal => "F002",
            FeatureError::ExtractionFailure { .. } => "F003",
            FeatureError::MalformedReference { .. } => "F004",
            FeatureError::Timeout { .. } => "F005",
            FeatureError::InvalidConfig { .. } => "F006",
        }
    }
}
