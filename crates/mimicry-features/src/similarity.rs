//! Per-feature similarity between two summary vectors.
//!
//! Scalars use a normalized difference against the larger operand; the MFCC
//! block uses cosine similarity. Every score lands in [0, 1]. No aggregate is
//! computed here: deciding what counts as a match is left to the caller.

use serde::{Deserialize, Serialize};

use crate::error::FeatureResult;
use crate::summary::SummaryVector;

/// Guards the scalar denominator when both operands are zero.
pub const SIMILARITY_EPSILON: f64 = 1e-6;

/// Summary components that receive a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Zcr,
    Energy,
    Centroid,
    Clarity,
    Mfcc,
}

impl Feature {
    /// All features in report order.
    pub const ALL: [Feature; 5] = [
        Feature::Zcr,
        Feature::Energy,
        Feature::Centroid,
        Feature::Clarity,
        Feature::Mfcc,
    ];

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Zcr => "zcr",
            Feature::Energy => "energy",
            Feature::Centroid => "centroid",
            Feature::Clarity => "clarity",
            Feature::Mfcc => "mfcc",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Similarity scores keyed by feature, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub zcr: f64,
    pub energy: f64,
    pub centroid: f64,
    pub clarity: f64,
    pub mfcc: f64,
}

impl SimilarityReport {
    /// Score for a single feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Zcr => self.zcr,
            Feature::Energy => self.energy,
            Feature::Centroid => self.centroid,
            Feature::Clarity => self.clarity,
            Feature::Mfcc => self.mfcc,
        }
    }

    /// `(feature, score)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Unweighted mean of the five scores. `compare` never applies it; callers
    /// choose whether to aggregate.
    pub fn mean(&self) -> f64 {
        self.iter().map(|(_, score)| score).sum::<f64>() / Feature::ALL.len() as f64
    }
}

/// `clamp(1 - |a - b| / (max(a, b) + ε), 0, 1)`; 0.0 if either input is not finite.
///
/// The denominator uses the larger operand, so this is not a metric. Only the
/// non-negative summary scalars are scored this way; a negative larger operand
/// flips the sign of the denominator and the score saturates at 1.0.
pub fn scalar_similarity(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }
    let score = 1.0 - (a - b).abs() / (a.max(b) + SIMILARITY_EPSILON);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Cosine similarity clamped to [0, 1].
///
/// Two all-zero vectors score 1.0 (both silent is a perfect match). Exactly
/// one all-zero vector, a length mismatch, or a non-finite result scores 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let cosine = dot / (norm_a * norm_b);
            if cosine.is_finite() {
                cosine.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
    }
}

/// Scores a probe vector against a reference vector.
pub fn compare(reference: &SummaryVector, probe: &SummaryVector) -> SimilarityReport {
    SimilarityReport {
        zcr: scalar_similarity(reference.zcr, probe.zcr),
        energy: scalar_similarity(reference.energy, probe.energy),
        centroid: scalar_similarity(reference.centroid, probe.centroid),
        clarity: scalar_similarity(reference.clarity, probe.clarity),
        mfcc: cosine_similarity(&reference.mfcc, &probe.mfcc),
    }
}

/// Scores a probe against a reference in its persisted JSON form.
///
/// The stored value is shape-checked first; a violation is reported as
/// [`FeatureError::MalformedReference`](crate::FeatureError::MalformedReference).
pub fn compare_stored(
    reference: &serde_json::Value,
    probe: &SummaryVector,
) -> FeatureResult<SimilarityReport> {
    let reference = SummaryVector::from_value(reference)?;
    Ok(compare(&reference, probe))
}
