//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json` and prints a single envelope:
//!
//! ```json
//! { "success": true, "errors": [], "result": { ... } }
//! ```

use std::fmt;
use std::process::ExitCode;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use mimicry_challenge::ChallengeError;
use mimicry_features::FeatureError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: CLI_XXX for CLI-level errors; feature (`F0xx`) and challenge
/// (`C0xx`) codes are passed through unchanged.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Pipeline config could not be loaded
    pub const CONFIG_LOAD: &str = "CLI_002";
    /// Input is neither a .wav file nor a .json summary
    pub const UNSUPPORTED_INPUT: &str = "CLI_003";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_004";
    /// Invalid combination of arguments
    pub const INVALID_ARGS: &str = "CLI_005";
    /// Verification mean score below the requested threshold
    pub const THRESHOLD_NOT_MET: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "F002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {} [{}]", file, self.message, self.code),
            None => write!(f, "{} [{}]", self.message, self.code),
        }
    }
}

impl std::error::Error for JsonError {}

impl From<FeatureError> for JsonError {
    fn from(err: FeatureError) -> Self {
        JsonError::new(err.code(), err.to_string())
    }
}

impl From<ChallengeError> for JsonError {
    fn from(err: ChallengeError) -> Self {
        JsonError::new(err.root_code(), err.to_string())
    }
}

/// The `--json` envelope shared by every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Command result (on success, and for partial batch results)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed output that still carries a result.
    pub fn partial(result: T, errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }

    /// Prints the envelope to stdout and returns the matching exit code.
    pub fn emit(&self) -> Result<ExitCode> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }
}

/// Renders a command result either as a JSON envelope or through `human`.
///
/// In human mode an error is returned to `main`, which prints it.
pub fn finish<T: Serialize>(
    outcome: std::result::Result<T, JsonError>,
    json_output: bool,
    human: impl FnOnce(&T),
) -> Result<ExitCode> {
    match outcome {
        Ok(result) if json_output => CommandOutput::success(result).emit(),
        Err(error) if json_output => CommandOutput::<T>::failure(vec![error]).emit(),
        Ok(result) => {
            human(&result);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => Err(error.into()),
    }
}
