//! Extract command implementation
//!
//! Extracts the summary vector of one `.wav` file, or of every `.wav` file under
//! a directory (batch mode).

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use mimicry_features::frames::FrameGeometry;
use mimicry_features::{
    decode_wav, summarize_signal, with_timeout, PipelineConfig, SummaryVector,
};

use super::json_output::{error_codes, finish, CommandOutput, JsonError};
use super::{is_wav, load_config, read_input};

/// Extraction result for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Input file path
    pub file: String,
    /// BLAKE3 hash of the input bytes
    pub sound_hash: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Decoded duration in seconds
    pub duration_seconds: f64,
    /// Number of complete analysis frames
    pub frames: usize,
    /// The summary vector
    pub summary: SummaryVector,
}

/// Per-file entry in batch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Input file path
    pub file: String,
    /// Result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExtractResult>,
    /// Error (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Batch extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Scanned directory
    pub input_dir: String,
    /// Number of files processed
    pub total: usize,
    /// Number of files that failed
    pub failed: usize,
    /// Entries in path order
    pub files: Vec<BatchEntry>,
}

/// Run the extract command.
///
/// # Arguments
/// * `input` - Path to a single `.wav` file
/// * `input_dir` - Directory to scan recursively for `.wav` files (batch mode)
/// * `output` - Optional file to also write the result to
/// * `config_path` - Optional pipeline config file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 if any file fails
pub fn run(
    input: Option<&str>,
    input_dir: Option<&str>,
    output: Option<&str>,
    config_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return finish::<ExtractResult>(Err(error), json_output, |_| {}),
    };

    match (input, input_dir) {
        (Some(input), None) => {
            let outcome = extract_file(Path::new(input), &config);
            if let (Ok(result), Some(output)) = (&outcome, output) {
                // a single-file output holds just the summary, ready for `compare`
                write_output(output, &result.summary)?;
            }
            finish(outcome, json_output, print_result)
        }
        (None, Some(dir)) => run_batch(dir, output, &config, json_output),
        _ => finish::<ExtractResult>(
            Err(JsonError::new(
                error_codes::INVALID_ARGS,
                "Specify exactly one of --input or --input-dir",
            )),
            json_output,
            |_| {},
        ),
    }
}

/// Extracts the summary of one WAV file.
pub fn extract_file(path: &Path, config: &PipelineConfig) -> Result<ExtractResult, JsonError> {
    let file = path.display().to_string();
    let bytes = read_input(&file)?;
    let sound_hash = blake3::hash(&bytes).to_hex().to_string();

    let signal = decode_wav(&bytes).map_err(|e| JsonError::from(e).with_file(&file))?;
    let sample_rate = signal.sample_rate;
    let duration_seconds = signal.duration_seconds();
    let frames = FrameGeometry::for_rate(sample_rate, config).frame_count(signal.len());

    let task_config = config.clone();
    let summary = with_timeout(config.timeout_seconds, move || {
        summarize_signal(&signal, &task_config)
    })
    .map_err(|e| JsonError::from(e).with_file(&file))?;

    Ok(ExtractResult {
        file,
        sound_hash,
        sample_rate,
        duration_seconds,
        frames,
        summary,
    })
}

fn run_batch(
    dir: &str,
    output: Option<&str>,
    config: &PipelineConfig,
    json_output: bool,
) -> Result<ExitCode> {
    if !Path::new(dir).is_dir() {
        return finish::<BatchResult>(
            Err(JsonError::new(
                error_codes::FILE_READ,
                format!("Input path is not a directory: {}", dir),
            )),
            json_output,
            |_| {},
        );
    }

    let mut wav_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_wav(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    // Sort for deterministic output
    wav_files.sort();

    let files: Vec<BatchEntry> = wav_files
        .iter()
        .map(|path| match extract_file(path, config) {
            Ok(result) => BatchEntry {
                file: result.file.clone(),
                result: Some(result),
                error: None,
            },
            Err(error) => BatchEntry {
                file: path.display().to_string(),
                result: None,
                error: Some(error),
            },
        })
        .collect();

    let failed = files.iter().filter(|f| f.error.is_some()).count();
    let batch = BatchResult {
        input_dir: dir.to_string(),
        total: files.len(),
        failed,
        files,
    };
    log::info!("extracted {} of {} files", batch.total - failed, batch.total);

    if let Some(output) = output {
        write_output(output, &batch)?;
    }

    if json_output {
        let errors: Vec<JsonError> = batch.files.iter().filter_map(|f| f.error.clone()).collect();
        let output = if errors.is_empty() {
            CommandOutput::success(batch)
        } else {
            CommandOutput::partial(batch, errors)
        };
        return output.emit();
    }

    print_batch(&batch);
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn write_output<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path))
}

fn print_result(result: &ExtractResult) {
    println!("{} {}", "File:".cyan().bold(), result.file);
    println!("  {} {}", "Hash:".dimmed(), &result.sound_hash[..16]);
    println!(
        "  {} {} Hz, {:.3}s, {} frames",
        "Signal:".dimmed(),
        result.sample_rate,
        result.duration_seconds,
        result.frames
    );
    print_summary(&result.summary);
}

pub(crate) fn print_summary(summary: &SummaryVector) {
    println!("{}", "Summary:".cyan().bold());
    println!("  {:<10} {:.6}", "zcr", summary.zcr);
    println!("  {:<10} {:.6}", "energy", summary.energy);
    println!("  {:<10} {:.2} Hz", "centroid", summary.centroid);
    println!("  {:<10} {:.6}", "clarity", summary.clarity);
    let mfcc: Vec<String> = summary.mfcc.iter().map(|c| format!("{:.3}", c)).collect();
    println!("  {:<10} [{}]", "mfcc", mfcc.join(", "));
}

fn print_batch(batch: &BatchResult) {
    println!("{} {}", "Scanned:".cyan().bold(), batch.input_dir);
    for entry in &batch.files {
        match (&entry.result, &entry.error) {
            (Some(result), _) => println!(
                "  {} {} ({} frames, centroid {:.1} Hz)",
                "OK".green().bold(),
                entry.file,
                result.frames,
                result.summary.centroid
            ),
            (None, Some(error)) => println!("  {} {}", "FAIL".red().bold(), error),
            (None, None) => {}
        }
    }

    let line = format!("{} files, {} failed", batch.total, batch.failed);
    if batch.failed == 0 {
        println!("\n{}", line.green());
    } else {
        println!("\n{}", line.red());
    }
}
