//! Determinism checks for the feature pipeline.
//!
//! Extraction must be a pure function of its input bytes: running it twice on
//! the same clip has to produce the same serialized summary.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// Index of the first run whose output differed from run 0.
    pub first_mismatch: Option<usize>,
}

impl fmt::Display for DeterminismResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_mismatch {
            None => write!(f, "{} runs identical ({})", self.runs, &self.hash[..16]),
            Some(run) => write!(f, "run {} differs from run 0 ({} runs)", run, self.runs),
        }
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        assert!(self.is_deterministic, "non-deterministic output: {}", self);
    }
}

/// BLAKE3 hex digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Runs `generate` `runs` times and compares the outputs byte for byte.
pub fn verify_determinism<F>(mut generate: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> Vec<u8>,
{
    assert!(runs >= 2, "need at least two runs to compare");

    let first = generate();
    let hash = compute_hash(&first);
    let first_mismatch = (1..runs).find(|_| generate() != first);

    DeterminismResult {
        is_deterministic: first_mismatch.is_none(),
        runs,
        hash,
        first_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_output_is_deterministic() {
        let result = verify_determinism(|| vec![1, 2, 3], 3);
        result.assert_deterministic();
        assert_eq!(result.hash, compute_hash(&[1, 2, 3]));
    }

    #[test]
    fn test_changing_output_is_detected() {
        let mut counter = 0u8;
        let result = verify_determinism(
            || {
                counter += 1;
                vec![counter]
            },
            3,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.first_mismatch, Some(1));
    }
}
