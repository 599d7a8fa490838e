//! Short-term feature extraction.
//!
//! Each complete analysis frame produces one row of [`FEATURE_COUNT`] values:
//!
//! | Index | Feature |
//! |-------|---------|
//! | 0 | Zero-crossing rate |
//! | 1 | Energy (mean squared amplitude) |
//! | 2 | Spectral centroid (Hz) |
//! | 3 | Spectral spread (Hz) |
//! | 4 | Energy entropy |
//! | 5 | Spectral entropy |
//! | 6 | Spectral flux |
//! | 7 | Spectral clarity |
//! | 8-20 | MFCC 0-12 |

use crate::config::PipelineConfig;
use crate::frames::FrameGeometry;
use crate::mfcc::MelCepstrum;
use crate::signal::AudioSignal;
use crate::spectral::{self, SpectrumAnalyzer};
use crate::summary::MFCC_COUNT;
use crate::temporal;

/// Width of a feature row.
pub const FEATURE_COUNT: usize = 21;

/// Zero-crossing rate column.
pub const ZCR: usize = 0;
/// Short-term energy column.
pub const ENERGY: usize = 1;
/// Spectral centroid column (Hz).
pub const CENTROID: usize = 2;
/// Spectral spread column (Hz).
pub const SPREAD: usize = 3;
/// Energy entropy column.
pub const ENERGY_ENTROPY: usize = 4;
/// Spectral entropy column.
pub const SPECTRAL_ENTROPY: usize = 5;
/// Spectral flux column.
pub const FLUX: usize = 6;
/// Spectral clarity column.
pub const CLARITY: usize = 7;
/// First of the [`MFCC_COUNT`] cepstral columns.
pub const MFCC_START: usize = 8;

/// Per-frame feature matrix, one row per analysis frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameFeatures {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FrameFeatures {
    /// Wraps precomputed rows.
    pub fn from_rows(rows: Vec<[f64; FEATURE_COUNT]>) -> Self {
        Self { rows }
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no frame was analyzed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in time order.
    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    /// Mean of one feature column across frames (0.0 when empty).
    pub fn column_mean(&self, column: usize) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(|row| row[column]).sum::<f64>() / self.rows.len() as f64
    }
}

/// Computes the feature matrix for a signal.
///
/// Returns an empty matrix when the frame geometry rounds to zero samples or
/// the signal is shorter than one frame.
pub fn extract_frame_features(signal: &AudioSignal, config: &PipelineConfig) -> FrameFeatures {
    let geometry = FrameGeometry::for_rate(signal.sample_rate, config);
    if !geometry.is_usable() {
        log::debug!(
            "frame geometry {:?} unusable at {} Hz",
            geometry,
            signal.sample_rate
        );
        return FrameFeatures::default();
    }

    let frame_count = geometry.frame_count(signal.len());
    log::debug!(
        "extracting {} frames (length {}, step {}) from {} samples",
        frame_count,
        geometry.length,
        geometry.step,
        signal.len()
    );
    if frame_count == 0 {
        return FrameFeatures::default();
    }

    let mut analyzer = SpectrumAnalyzer::new(geometry.length, signal.sample_rate);
    let cepstrum = MelCepstrum::new(config.mel_filters, geometry.length, signal.sample_rate);
    let bin_hz = analyzer.bin_hz();

    let mut rows = Vec::with_capacity(frame_count);
    let mut previous: Option<Vec<f64>> = None;

    for frame in geometry.frames(&signal.samples) {
        let mags = analyzer.magnitudes(frame);
        let centroid_hz = spectral::centroid(&mags, bin_hz);

        let mut row = [0.0; FEATURE_COUNT];
        row[ZCR] = temporal::zero_crossing_rate(frame);
        row[ENERGY] = temporal::energy(frame);
        row[CENTROID] = centroid_hz;
        row[SPREAD] = spectral::spread(&mags, bin_hz, centroid_hz);
        row[ENERGY_ENTROPY] = temporal::energy_entropy(frame);
        row[SPECTRAL_ENTROPY] = spectral::entropy(&mags);
        row[FLUX] = spectral::flux(&mags, previous.as_deref());
        row[CLARITY] = spectral::clarity(&mags);
        row[MFCC_START..MFCC_START + MFCC_COUNT].copy_from_slice(&cepstrum.coefficients(&mags));

        rows.push(row);
        previous = Some(mags);
    }

    FrameFeatures::from_rows(rows)
}
