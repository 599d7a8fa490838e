//! Validation gate and pipeline entry points.
//!
//! The gate runs before any feature math: undecodable bytes fail with
//! [`FeatureError::Decode`], a zero-length signal with [`FeatureError::EmptySignal`],
//! and a signal that yields no complete frame with [`FeatureError::ExtractionFailure`].
//! Downstream stages may therefore assume non-empty input.

use std::time::Duration;

use crate::config::PipelineConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::extract::extract_frame_features;
use crate::frames::FrameGeometry;
use crate::signal::{decode_wav, AudioSignal};
use crate::summary::{reduce, SummaryVector};

/// Extracts a summary vector from WAV bytes with the default configuration.
pub fn extract_summary(bytes: &[u8]) -> FeatureResult<SummaryVector> {
    extract_summary_with(bytes, &PipelineConfig::default())
}

/// Extracts a summary vector from WAV bytes.
pub fn extract_summary_with(bytes: &[u8], config: &PipelineConfig) -> FeatureResult<SummaryVector> {
    let signal = decode_wav(bytes)?;
    summarize_signal(&signal, config)
}

/// Runs the gate, the extractor and the reducer over an already-decoded signal.
pub fn summarize_signal(signal: &AudioSignal, config: &PipelineConfig) -> FeatureResult<SummaryVector> {
    config.validate()?;
    if signal.is_empty() {
        return Err(FeatureError::EmptySignal);
    }

    let features = extract_frame_features(signal, config);
    if features.is_empty() {
        let geometry = FrameGeometry::for_rate(signal.sample_rate, config);
        let message = if geometry.is_usable() {
            format!(
                "signal of {} samples is shorter than one {}-sample frame",
                signal.len(),
                geometry.length
            )
        } else {
            format!(
                "frame length rounds to zero samples at {} Hz",
                signal.sample_rate
            )
        };
        return Err(FeatureError::extraction(message));
    }

    let summary = reduce(&features)?;
    log::debug!(
        "summarized {} frames: zcr={:.4} energy={:.6} centroid={:.1}Hz clarity={:.4}",
        features.frame_count(),
        summary.zcr,
        summary.energy,
        summary.centroid,
        summary.clarity
    );
    Ok(summary)
}

/// Extracts a summary vector on a blocking worker, bounded by
/// `config.timeout_seconds`.
pub fn extract_summary_with_timeout(
    bytes: &[u8],
    config: &PipelineConfig,
) -> FeatureResult<SummaryVector> {
    let bytes = bytes.to_vec();
    let config_for_task = config.clone();
    with_timeout(config.timeout_seconds, move || {
        extract_summary_with(&bytes, &config_for_task)
    })
}

/// Runs a synchronous job under a wall-clock limit.
///
/// Uses a current-thread tokio runtime with `spawn_blocking`. On timeout the
/// runtime is shut down in the background, so the caller does not wait for the
/// abandoned job. When called from inside a tokio runtime, the bounded runtime
/// is built on a dedicated thread and the calling thread blocks until it ends.
pub fn with_timeout<T, F>(seconds: u64, job: F) -> FeatureResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> FeatureResult<T> + Send + 'static,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return run_bounded(seconds, job);
    }

    std::thread::Builder::new()
        .name("mimicry-bounded".to_string())
        .spawn(move || run_bounded(seconds, job))
        .map_err(|e| FeatureError::extraction(format!("failed to spawn worker: {}", e)))?
        .join()
        .map_err(|_| FeatureError::extraction("worker thread panicked"))?
}

fn run_bounded<T, F>(seconds: u64, job: F) -> FeatureResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> FeatureResult<T> + Send + 'static,
{
    use tokio::runtime::Builder;
    use tokio::time::timeout;

    let rt = Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| FeatureError::extraction(format!("failed to create runtime: {}", e)))?;

    let result = rt.block_on(async {
        match timeout(
            Duration::from_secs(seconds),
            tokio::task::spawn_blocking(job),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(FeatureError::extraction(format!("task panicked: {}", e))),
            Err(_) => Err(FeatureError::Timeout { seconds }),
        }
    });

    rt.shutdown_background();
    result
}
