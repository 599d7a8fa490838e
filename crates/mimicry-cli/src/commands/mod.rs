//! CLI command implementations

pub mod challenge;
pub mod compare;
pub mod extract;
pub mod json_output;
pub mod verify;

use std::fs;
use std::path::Path;

use mimicry_challenge::{ChallengeService, JsonDirStore};
use mimicry_features::PipelineConfig;

use json_output::{error_codes, JsonError};

/// Default directory for the challenge store.
pub const DEFAULT_STORE_DIR: &str = "challenges";

/// Loads the pipeline config from `path`, or the defaults.
pub(crate) fn load_config(path: Option<&str>) -> Result<PipelineConfig, JsonError> {
    match path {
        Some(path) => PipelineConfig::from_file(Path::new(path)).map_err(|e| {
            JsonError::new(error_codes::CONFIG_LOAD, e.to_string()).with_file(path)
        }),
        None => Ok(PipelineConfig::default()),
    }
}

/// Reads a whole input file.
pub(crate) fn read_input(path: &str) -> Result<Vec<u8>, JsonError> {
    fs::read(path).map_err(|e| {
        JsonError::new(error_codes::FILE_READ, format!("Failed to read file: {}", e))
            .with_file(path)
    })
}

/// Opens the challenge service over a JSON directory store.
pub(crate) fn open_service(
    store_dir: &str,
    config: PipelineConfig,
) -> Result<ChallengeService<JsonDirStore>, JsonError> {
    let store = JsonDirStore::open(store_dir)
        .map_err(|e| JsonError::from(e).with_file(store_dir))?;
    Ok(ChallengeService::new(store, config))
}

/// True if `path` has a `.wav` extension (any case).
pub(crate) fn is_wav(path: &Path) -> bool {
    has_extension(path, "wav")
}

pub(crate) fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}
