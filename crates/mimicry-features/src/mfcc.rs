//! Mel filterbank and cepstral coefficients.

use std::f64::consts::PI;

use crate::summary::MFCC_COUNT;

/// Floor added to filterbank energies before the logarithm.
const LOG_FLOOR: f64 = 1e-10;

/// Converts frequency in Hz to mel scale.
fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel scale frequency back to Hz.
fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank followed by a log and an orthonormal DCT-II.
pub struct MelCepstrum {
    /// `[num_filters][num_bins]` filter weights.
    filters: Vec<Vec<f64>>,
    /// `[MFCC_COUNT][num_filters]` DCT basis rows, already scaled.
    dct: Vec<Vec<f64>>,
}

impl MelCepstrum {
    /// Builds the filterbank for spectra of `frame_len / 2 + 1` bins.
    ///
    /// Filters are spaced evenly on the mel scale between 0 Hz and Nyquist.
    pub fn new(num_filters: usize, frame_len: usize, sample_rate: u32) -> Self {
        let num_bins = frame_len / 2 + 1;
        let filters = mel_filter_bank(
            num_filters,
            frame_len,
            sample_rate as f64,
            0.0,
            sample_rate as f64 / 2.0,
        );
        debug_assert!(filters.iter().all(|f| f.len() == num_bins));

        Self {
            filters,
            dct: dct_basis(MFCC_COUNT, num_filters),
        }
    }

    /// Number of filters in the bank.
    pub fn num_filters(&self) -> usize {
        self.filters.len()
    }

    /// Computes the first [`MFCC_COUNT`] cepstral coefficients of a magnitude spectrum.
    pub fn coefficients(&self, magnitudes: &[f64]) -> [f64; MFCC_COUNT] {
        let log_energies: Vec<f64> = self
            .filters
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .iter()
                    .zip(magnitudes)
                    .map(|(w, m)| w * m * m)
                    .sum();
                (energy + LOG_FLOOR).log10()
            })
            .collect();

        let mut out = [0.0; MFCC_COUNT];
        for (coeff, basis) in out.iter_mut().zip(&self.dct) {
            *coeff = basis.iter().zip(&log_energies).map(|(b, e)| b * e).sum();
        }
        out
    }
}

/// Creates the mel filterbank matrix.
///
/// Returns `[num_mels][fft_size / 2 + 1]`.
fn mel_filter_bank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: f64,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);

    // num_mels + 2 equally spaced mel points
    let step = (high_mel - low_mel) / (num_mels + 1) as f64;
    let mut bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let hz = mel_to_hz(low_mel + i as f64 * step);
            let bin = (hz * fft_size as f64 / sample_rate).round() as usize;
            bin.min(half_fft - 1)
        })
        .collect();

    // Every filter spans at least one bin
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = bins[i - 1] + 1;
        }
    }

    let mut bank = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let mut filter = vec![0.0f64; half_fft];
        let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);

        for k in left..center.min(half_fft) {
            filter[k] = (k - left) as f64 / (center - left) as f64;
        }
        for k in center..=right.min(half_fft - 1) {
            filter[k] = (right - k) as f64 / (right - center) as f64;
        }
        bank.push(filter);
    }
    bank
}

/// Orthonormal DCT-II rows `0..count` for inputs of length `n`.
fn dct_basis(count: usize, n: usize) -> Vec<Vec<f64>> {
    let n_f = n as f64;
    (0..count)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n_f).sqrt()
            } else {
                (2.0 / n_f).sqrt()
            };
            (0..n)
                .map(|i| scale * (PI * k as f64 * (i as f64 + 0.5) / n_f).cos())
                .collect()
        })
        .collect()
}
