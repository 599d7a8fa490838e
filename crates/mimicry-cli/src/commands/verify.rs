//! Verify command implementation
//!
//! Scores a recorded attempt against a stored challenge. With `--threshold`,
//! the command also fails when the mean score falls short.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use mimicry_challenge::VerificationOutcome;

use super::compare::colorize_score;
use super::json_output::{error_codes, finish, CommandOutput, JsonError};
use super::{load_config, open_service, read_input};

/// JSON result of the verify command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    #[serde(flatten)]
    pub outcome: VerificationOutcome,
    /// Requested threshold on the mean score (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Whether the mean score reached the threshold (if one was given)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

/// Run the verify command.
///
/// # Arguments
/// * `store` - Challenge store directory
/// * `id` - Challenge id
/// * `voice` - Recorded attempt (`.wav`)
/// * `threshold` - Optional minimum mean score in [0, 1]
/// * `config_path` - Optional pipeline config file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error or when the threshold is not met
pub fn run(
    store: &str,
    id: u64,
    voice: &str,
    threshold: Option<f64>,
    config_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let result = match verify(store, id, voice, threshold, config_path) {
        Ok(result) => result,
        Err(error) => return finish::<VerifyResult>(Err(error), json_output, |_| {}),
    };

    if result.passed != Some(false) {
        return finish(Ok(result), json_output, print_result);
    }

    if json_output {
        let error = JsonError::new(
            error_codes::THRESHOLD_NOT_MET,
            format!(
                "Mean score {:.3} is below threshold {:.3}",
                result.outcome.mean_score,
                result.threshold.unwrap_or_default()
            ),
        );
        return CommandOutput::partial(result, vec![error]).emit();
    }

    print_result(&result);
    Ok(ExitCode::from(1))
}

fn verify(
    store: &str,
    id: u64,
    voice: &str,
    threshold: Option<f64>,
    config_path: Option<&str>,
) -> Result<VerifyResult, JsonError> {
    if let Some(t) = threshold {
        if !(0.0..=1.0).contains(&t) {
            return Err(JsonError::new(
                error_codes::INVALID_ARGS,
                format!("Threshold must be between 0 and 1, got {}", t),
            ));
        }
    }

    let config = load_config(config_path)?;
    let audio = read_input(voice)?;
    let service = open_service(store, config)?;
    let outcome = service
        .verify(id, &audio)
        .map_err(|e| JsonError::from(e).with_file(voice))?;

    Ok(VerifyResult {
        outcome,
        threshold,
        passed: threshold.map(|t| outcome.passes(t)),
    })
}

fn print_result(result: &VerifyResult) {
    println!(
        "{} challenge {}",
        "Verified against".cyan().bold(),
        result.outcome.challenge_id
    );
    for (feature, score) in result.outcome.report.iter() {
        println!("  {:<10} {}", feature.to_string(), colorize_score(score));
    }
    println!("  {:<10} {}", "mean", colorize_score(result.outcome.mean_score));

    match (result.threshold, result.passed) {
        (Some(t), Some(true)) => println!("\n{} (threshold {:.3})", "PASS".green().bold(), t),
        (Some(t), Some(false)) => println!("\n{} (threshold {:.3})", "FAIL".red().bold(), t),
        _ => {}
    }
}
