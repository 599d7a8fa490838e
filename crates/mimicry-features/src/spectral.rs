//! Magnitude spectrum and spectral frame descriptors.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of sub-bands used for spectral entropy.
const ENTROPY_BANDS: usize = 10;

const EPS: f64 = 1e-8;

/// Computes one-sided magnitude spectra for frames of a fixed length.
///
/// The FFT plan is built once and reused for every frame.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    frame_len: usize,
    bin_hz: f64,
}

impl SpectrumAnalyzer {
    /// Plans a forward FFT for `frame_len`-sample frames.
    pub fn new(frame_len: usize, sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_len);
        let bin_hz = if frame_len > 0 {
            sample_rate as f64 / frame_len as f64
        } else {
            0.0
        };

        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); frame_len],
            frame_len,
            bin_hz,
        }
    }

    /// Frequency spacing between bins in Hz.
    pub fn bin_hz(&self) -> f64 {
        self.bin_hz
    }

    /// Number of bins in each spectrum (`frame_len / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.frame_len / 2 + 1
    }

    /// Returns `|X[k]| / frame_len` for `k` in `0..=frame_len / 2`.
    ///
    /// `frame` must hold exactly `frame_len` samples.
    pub fn magnitudes(&mut self, frame: &[f32]) -> Vec<f64> {
        debug_assert_eq!(frame.len(), self.frame_len);

        for (slot, &s) in self.buffer.iter_mut().zip(frame) {
            *slot = Complex::new(s, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = self.frame_len.max(1) as f64;
        self.buffer
            .iter()
            .take(self.num_bins())
            .map(|c| (c.re * c.re + c.im * c.im).sqrt() as f64 / scale)
            .collect()
    }
}

/// Magnitude-weighted mean frequency in Hz.
pub fn centroid(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let mag_sum: f64 = magnitudes.iter().sum();
    if mag_sum <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(i, m)| i as f64 * bin_hz * m)
        .sum();
    weighted / mag_sum
}

/// Magnitude-weighted standard deviation around the centroid, in Hz.
pub fn spread(magnitudes: &[f64], bin_hz: f64, centroid_hz: f64) -> f64 {
    let mag_sum: f64 = magnitudes.iter().sum();
    if mag_sum <= 0.0 {
        return 0.0;
    }
    let variance: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64 * bin_hz - centroid_hz).powi(2) * m)
        .sum::<f64>()
        / mag_sum;
    variance.sqrt()
}

/// Entropy of the power distribution over equal sub-bands.
pub fn entropy(magnitudes: &[f64]) -> f64 {
    let band_len = magnitudes.len() / ENTROPY_BANDS;
    if band_len == 0 {
        return 0.0;
    }

    let total: f64 = magnitudes.iter().map(|m| m * m).sum();

    magnitudes
        .chunks_exact(band_len)
        .take(ENTROPY_BANDS)
        .map(|band| {
            let band_power: f64 = band.iter().map(|m| m * m).sum();
            let p = band_power / (total + EPS);
            -p * (p + EPS).log2()
        })
        .sum()
}

/// Squared distance between the sum-normalized current and previous spectra.
///
/// Returns 0.0 when there is no previous spectrum.
pub fn flux(magnitudes: &[f64], previous: Option<&[f64]>) -> f64 {
    let Some(previous) = previous else {
        return 0.0;
    };

    let sum: f64 = magnitudes.iter().sum::<f64>() + EPS;
    let prev_sum: f64 = previous.iter().sum::<f64>() + EPS;

    magnitudes
        .iter()
        .zip(previous)
        .map(|(m, p)| (m / sum - p / prev_sum).powi(2))
        .sum()
}

/// Share of the frame's spectral power held by its strongest bin.
///
/// Close to 1.0 for a pure tone, small for broadband noise, 0.0 for silence.
pub fn clarity(magnitudes: &[f64]) -> f64 {
    let total: f64 = magnitudes.iter().map(|m| m * m).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let peak = magnitudes.iter().cloned().fold(0.0f64, f64::max);
    (peak * peak / total).min(1.0)
}
