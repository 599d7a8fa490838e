//! Decoded mono audio and the WAV decoder adapter.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{FeatureError, FeatureResult};

/// A decoded mono signal.
///
/// Samples are amplitudes normalized to [-1.0, 1.0]. Multi-channel sources are
/// reduced to channel 0 by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel-0 samples in time order.
    pub samples: Vec<f32>,
}

impl AudioSignal {
    /// Creates a signal from already-decoded mono samples.
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a zero sample rate).
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decodes WAV bytes into a mono [`AudioSignal`].
///
/// Integer PCM is scaled by `2^(bits - 1)`; float PCM is used as-is. Only
/// channel 0 is kept.
pub fn decode_wav(bytes: &[u8]) -> FeatureResult<AudioSignal> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| FeatureError::decode(e.to_string()))?;
    read_channel_zero(reader)
}

/// Decodes a WAV file on disk into a mono [`AudioSignal`].
pub fn decode_wav_file(path: &Path) -> FeatureResult<AudioSignal> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| FeatureError::decode(format!("{}: {}", path.display(), e)))?;
    read_channel_zero(reader)
}

fn read_channel_zero<R: Read>(reader: hound::WavReader<R>) -> FeatureResult<AudioSignal> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(FeatureError::decode(format!(
                    "unsupported bits per sample: {}",
                    spec.bits_per_sample
                )));
            }
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
                .map_err(|e| FeatureError::decode(e.to_string()))?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| FeatureError::decode(e.to_string()))?,
    };

    let samples: Vec<f32> = interleaved.into_iter().step_by(channels).collect();

    log::debug!(
        "decoded {} samples at {} Hz ({} channel(s) in source)",
        samples.len(),
        spec.sample_rate,
        channels
    );

    Ok(AudioSignal::new(spec.sample_rate, samples))
}
