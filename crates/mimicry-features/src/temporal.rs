//! Time-domain frame descriptors.

/// Number of sub-blocks used for energy entropy.
const ENTROPY_BLOCKS: usize = 10;

const EPS: f64 = 1e-8;

/// Fraction of adjacent sample pairs whose sign differs.
pub fn zero_crossing_rate(frame: &[f32]) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings: usize = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();

    crossings as f64 / (frame.len() - 1) as f64
}

/// Mean squared amplitude.
pub fn energy(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame.iter().map(|&s| (s as f64).powi(2)).sum();
    sum_sq / frame.len() as f64
}

/// Entropy of the energy distribution over equal sub-blocks of the frame.
///
/// Low values indicate an abrupt energy change inside the frame.
pub fn energy_entropy(frame: &[f32]) -> f64 {
    let block_len = frame.len() / ENTROPY_BLOCKS;
    if block_len == 0 {
        return 0.0;
    }

    let total: f64 = frame.iter().map(|&s| (s as f64).powi(2)).sum();

    frame
        .chunks_exact(block_len)
        .take(ENTROPY_BLOCKS)
        .map(|block| {
            let block_energy: f64 = block.iter().map(|&s| (s as f64).powi(2)).sum();
            let p = block_energy / (total + EPS);
            -p * (p + EPS).log2()
        })
        .sum()
}
