//! Compare command implementation
//!
//! Scores a probe against a reference. Either side may be a `.wav` file, which
//! is run through the pipeline, or a `.json` file holding a stored summary
//! vector (as written by `extract --output`).

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use mimicry_features::{compare_stored, PipelineConfig, SimilarityReport, SummaryVector};

use super::extract::extract_file;
use super::json_output::{error_codes, finish, JsonError};
use super::{has_extension, is_wav, load_config, read_input};

/// Result of comparing two inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResult {
    /// Reference input path
    pub reference: String,
    /// Probe input path
    pub probe: String,
    /// Per-feature similarity
    pub report: SimilarityReport,
    /// Unweighted mean of the report entries
    pub mean_score: f64,
}

/// Run the compare command.
///
/// # Arguments
/// * `reference` - Reference `.wav` or `.json` summary
/// * `probe` - Probe `.wav` or `.json` summary
/// * `config_path` - Optional pipeline config file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    reference: &str,
    probe: &str,
    config_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let outcome = load_config(config_path).and_then(|config| compare_inputs(reference, probe, &config));
    finish(outcome, json_output, print_result)
}

/// Compares two inputs, each a `.wav` file or a `.json` summary.
pub fn compare_inputs(
    reference: &str,
    probe: &str,
    config: &PipelineConfig,
) -> Result<CompareResult, JsonError> {
    let reference_value = load_side(reference, config)?;
    let probe_value = load_side(probe, config)?;

    let probe_summary = SummaryVector::from_value(&probe_value)
        .map_err(|e| JsonError::from(e).with_file(probe))?;
    let report = compare_stored(&reference_value, &probe_summary)
        .map_err(|e| JsonError::from(e).with_file(reference))?;

    Ok(CompareResult {
        reference: reference.to_string(),
        probe: probe.to_string(),
        report,
        mean_score: report.mean(),
    })
}

/// Loads one side in its persisted JSON form.
fn load_side(path: &str, config: &PipelineConfig) -> Result<serde_json::Value, JsonError> {
    let p = Path::new(path);
    if is_wav(p) {
        return Ok(extract_file(p, config)?.summary.to_value());
    }
    if has_extension(p, "json") {
        let bytes = read_input(path)?;
        return serde_json::from_slice(&bytes).map_err(|e| {
            JsonError::new(error_codes::JSON_PARSE, format!("Invalid JSON: {}", e)).with_file(path)
        });
    }
    Err(JsonError::new(
        error_codes::UNSUPPORTED_INPUT,
        format!(
            "Unsupported input format: {}",
            p.extension().and_then(|e| e.to_str()).unwrap_or("(none)")
        ),
    )
    .with_file(path))
}

fn print_result(result: &CompareResult) {
    println!("{}", "Comparing:".cyan().bold());
    println!("  {} {}", "Reference:".dimmed(), result.reference);
    println!("  {} {}", "Probe:".dimmed(), result.probe);
    println!("\n{}", "Similarity:".cyan().bold());
    for (feature, score) in result.report.iter() {
        println!("  {:<10} {}", feature.to_string(), colorize_score(score));
    }
    println!("  {:<10} {}", "mean", colorize_score(result.mean_score));
}

pub(crate) fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{:.3}", score);
    if score >= 0.8 {
        text.green()
    } else if score >= 0.5 {
        text.yellow()
    } else {
        text.red()
    }
}
