//! Voice verification against a stored challenge.
//!
//! An uploaded attempt is staged to a uniquely named file
//! (`voice-<id>-<random>.wav`), so concurrent attempts on the same challenge
//! never share a path. The probe vector is extracted from that file under the
//! pipeline timeout, and the file is removed whether or not extraction succeeds.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use mimicry_features::{
    compare_stored, decode_wav_file, summarize_signal, with_timeout, FeatureResult,
    PipelineConfig, SimilarityReport, SummaryVector,
};

use crate::error::ChallengeResult;
use crate::record::ChallengeRecord;

/// Result of scoring one attempt against a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub challenge_id: u64,
    pub report: SimilarityReport,
    /// Unweighted mean of the five report entries.
    pub mean_score: f64,
}

impl VerificationOutcome {
    pub fn new(challenge_id: u64, report: SimilarityReport) -> Self {
        Self {
            challenge_id,
            report,
            mean_score: report.mean(),
        }
    }

    /// True if the mean score reaches `threshold`.
    pub fn passes(&self, threshold: f64) -> bool {
        self.mean_score >= threshold
    }
}

/// Scores `voice` (WAV bytes) against the reference stored on `record`.
pub(crate) fn verify_record(
    record: &ChallengeRecord,
    voice: &[u8],
    config: &PipelineConfig,
    staging_dir: &Path,
) -> ChallengeResult<VerificationOutcome> {
    let staged = stage_voice(staging_dir, record.id, voice)?;
    log::debug!(
        "staged {} bytes for challenge {} at {}",
        voice.len(),
        record.id,
        staged.path().display()
    );

    let probe = extract_probe(staged.path().to_path_buf(), config.clone());
    conclude(record, staged, probe)
}

/// Releases the staged file, then scores the probe. The outcome of the
/// extraction decides the result; cleanup never does.
fn conclude(
    record: &ChallengeRecord,
    staged: NamedTempFile,
    probe: FeatureResult<SummaryVector>,
) -> ChallengeResult<VerificationOutcome> {
    release(staged);
    let probe = probe?;

    let report = compare_stored(&record.features, &probe)?;
    let outcome = VerificationOutcome::new(record.id, report);
    log::info!(
        "verified attempt against challenge {}: mean score {:.3}",
        record.id,
        outcome.mean_score
    );
    Ok(outcome)
}

fn stage_voice(dir: &Path, id: u64, voice: &[u8]) -> ChallengeResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("voice-{}-", id))
        .suffix(".wav")
        .tempfile_in(dir)?;
    file.write_all(voice)?;
    file.flush()?;
    Ok(file)
}

fn extract_probe(path: PathBuf, config: PipelineConfig) -> FeatureResult<SummaryVector> {
    let seconds = config.timeout_seconds;
    with_timeout(seconds, move || {
        let signal = decode_wav_file(&path)?;
        summarize_signal(&signal, &config)
    })
}

/// Removes a staged file. A failure is logged and otherwise ignored.
fn release(staged: NamedTempFile) {
    let path = staged.path().to_path_buf();
    if let Err(e) = staged.close() {
        log::warn!("failed to remove staged voice file {}: {}", path.display(), e);
    }
}
