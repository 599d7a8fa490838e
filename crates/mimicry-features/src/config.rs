//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, FeatureResult};
use crate::summary::MFCC_COUNT;

/// Default analysis frame duration in seconds.
pub const DEFAULT_FRAME_SECONDS: f64 = 0.050;

/// Default hop between frame starts in seconds (50% overlap).
pub const DEFAULT_STEP_SECONDS: f64 = 0.025;

/// Default number of triangular mel filters.
pub const DEFAULT_MEL_FILTERS: usize = 40;

/// Default extraction timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the feature pipeline.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Analysis frame duration in seconds (default: 0.050).
    pub frame_seconds: f64,
    /// Hop between frame starts in seconds (default: 0.025).
    pub step_seconds: f64,
    /// Number of mel filters feeding the cepstrum (default: 40).
    pub mel_filters: usize,
    /// Wall-clock limit for timeout-bounded extraction (default: 30).
    pub timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_seconds: DEFAULT_FRAME_SECONDS,
            step_seconds: DEFAULT_STEP_SECONDS,
            mel_filters: DEFAULT_MEL_FILTERS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from a JSON file and validate it.
    pub fn from_file(path: &Path) -> FeatureResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FeatureError::config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            FeatureError::config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable by the extractor.
    pub fn validate(&self) -> FeatureResult<()> {
        if !(self.frame_seconds.is_finite() && self.frame_seconds > 0.0) {
            return Err(FeatureError::config(format!(
                "frame_seconds must be positive, got {}",
                self.frame_seconds
            )));
        }
        if !(self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            return Err(FeatureError::config(format!(
                "step_seconds must be positive, got {}",
                self.step_seconds
            )));
        }
        if self.mel_filters < MFCC_COUNT {
            return Err(FeatureError::config(format!(
                "mel_filters must be at least {}, got {}",
                MFCC_COUNT, self.mel_filters
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(FeatureError::config("timeout_seconds must be non-zero"));
        }
        Ok(())
    }
}
