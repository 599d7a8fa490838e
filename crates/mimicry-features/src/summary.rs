//! Reduction of a feature matrix to the persisted summary vector.
//!
//! The summary has a fixed shape regardless of clip duration. On the wire it is
//! a 5-element JSON array:
//!
//! ```text
//! [zcr, energy, centroid, clarity, [mfcc0, ..., mfcc12]]
//! ```

use serde::de::Error as _;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FeatureError, FeatureResult};
use crate::extract::{FrameFeatures, CENTROID, CLARITY, ENERGY, MFCC_START, ZCR};

/// Number of top-level elements in a serialized summary.
pub const SUMMARY_LEN: usize = 5;

/// Number of cepstral coefficients kept per frame and in the summary.
pub const MFCC_COUNT: usize = 13;

/// Clip-level feature summary: per-feature means across all frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryVector {
    /// Mean zero-crossing rate.
    pub zcr: f64,
    /// Mean short-term energy.
    pub energy: f64,
    /// Mean spectral centroid in Hz.
    pub centroid: f64,
    /// Mean spectral clarity.
    pub clarity: f64,
    /// Per-coefficient MFCC means.
    pub mfcc: [f64; MFCC_COUNT],
}

impl SummaryVector {
    /// The four scalar components in persisted order.
    pub fn scalars(&self) -> [f64; 4] {
        [self.zcr, self.energy, self.centroid, self.clarity]
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.scalars().iter().chain(self.mfcc.iter()).all(|v| v.is_finite())
    }

    /// Serializes to the persisted `[f, f, f, f, [f; 13]]` form.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!([
            self.zcr,
            self.energy,
            self.centroid,
            self.clarity,
            self.mfcc.to_vec()
        ])
    }

    /// Parses the persisted form, reporting any shape violation as
    /// [`FeatureError::MalformedReference`].
    pub fn from_value(value: &serde_json::Value) -> FeatureResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| FeatureError::malformed(format!("expected an array, got {}", kind(value))))?;
        if items.len() != SUMMARY_LEN {
            return Err(FeatureError::malformed(format!(
                "expected exactly {} elements, got {}",
                SUMMARY_LEN,
                items.len()
            )));
        }

        let scalar = |index: usize| -> FeatureResult<f64> {
            items[index]
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    FeatureError::malformed(format!(
                        "element {} must be a finite number, got {}",
                        index,
                        kind(&items[index])
                    ))
                })
        };

        let coeffs = items[4].as_array().ok_or_else(|| {
            FeatureError::malformed(format!(
                "element 4 must be an array of {} numbers, got {}",
                MFCC_COUNT,
                kind(&items[4])
            ))
        })?;
        if coeffs.len() != MFCC_COUNT {
            return Err(FeatureError::malformed(format!(
                "element 4 must hold {} MFCC values, got {}",
                MFCC_COUNT,
                coeffs.len()
            )));
        }

        let mut mfcc = [0.0; MFCC_COUNT];
        for (i, (slot, v)) in mfcc.iter_mut().zip(coeffs).enumerate() {
            *slot = v.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
                FeatureError::malformed(format!(
                    "MFCC value {} must be a finite number, got {}",
                    i,
                    kind(v)
                ))
            })?;
        }

        Ok(Self {
            zcr: scalar(0)?,
            energy: scalar(1)?,
            centroid: scalar(2)?,
            clarity: scalar(3)?,
            mfcc,
        })
    }
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl Serialize for SummaryVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(SUMMARY_LEN)?;
        tuple.serialize_element(&self.zcr)?;
        tuple.serialize_element(&self.energy)?;
        tuple.serialize_element(&self.centroid)?;
        tuple.serialize_element(&self.clarity)?;
        tuple.serialize_element(&self.mfcc[..])?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for SummaryVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        SummaryVector::from_value(&value).map_err(D::Error::custom)
    }
}

/// Collapses a feature matrix into its clip-level summary.
///
/// Each component is the arithmetic mean of its column over all frames. Fails
/// with [`FeatureError::ExtractionFailure`] on an empty matrix or if any mean
/// is not finite.
pub fn reduce(features: &FrameFeatures) -> FeatureResult<SummaryVector> {
    if features.is_empty() {
        return Err(FeatureError::extraction("no complete analysis frames"));
    }

    let mut mfcc = [0.0; MFCC_COUNT];
    for (i, slot) in mfcc.iter_mut().enumerate() {
        *slot = features.column_mean(MFCC_START + i);
    }

    let summary = SummaryVector {
        zcr: features.column_mean(ZCR),
        energy: features.column_mean(ENERGY),
        centroid: features.column_mean(CENTROID),
        clarity: features.column_mean(CLARITY),
        mfcc,
    };

    if !summary.is_finite() {
        return Err(FeatureError::extraction(
            "non-finite value in reduced feature vector",
        ));
    }

    Ok(summary)
}
