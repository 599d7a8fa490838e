//! Challenge records and field validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mimicry_features::{FeatureResult, SummaryVector};

use crate::error::{ChallengeError, ChallengeResult};

/// Longest accepted challenge name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// URL schemes accepted for `sound_url`. `file` covers references created
/// from local recordings.
pub const SOUND_URL_SCHEMES: [&str; 5] = ["http://", "https://", "ftp://", "ftps://", "file://"];

const LEVELS_MESSAGE: &str = "All values in levels must be floating-point numbers between 0 and 1.";

/// A stored voice challenge.
///
/// `features` holds the reference summary vector in its persisted JSON shape.
/// It is kept as a raw value so that a damaged vector still loads and is
/// reported as a malformed reference when a comparison is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub id: u64,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sound_url: String,
    /// BLAKE3 hex digest of the reference audio.
    pub sound_hash: String,
    #[serde(default)]
    pub levels: Vec<f64>,
    pub features: serde_json::Value,
}

impl ChallengeRecord {
    /// Parses the stored reference vector.
    pub fn reference_summary(&self) -> FeatureResult<SummaryVector> {
        SummaryVector::from_value(&self.features)
    }
}

/// Fields supplied when creating a challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChallenge {
    pub name: String,
    pub created_by: String,
    pub sound_url: String,
    pub levels: Vec<f64>,
}

impl NewChallenge {
    /// Creates a challenge description with no levels.
    pub fn new(
        name: impl Into<String>,
        created_by: impl Into<String>,
        sound_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            created_by: created_by.into(),
            sound_url: sound_url.into(),
            levels: Vec::new(),
        }
    }

    /// Sets the levels.
    pub fn levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = levels;
        self
    }

    /// Validates every field.
    pub fn validate(&self) -> ChallengeResult<()> {
        validate_name(&self.name)?;
        if self.created_by.trim().is_empty() {
            return Err(ChallengeError::invalid("created_by", "must not be empty"));
        }
        validate_sound_url(&self.sound_url)?;
        validate_levels(&self.levels)
    }
}

/// A partial update. Unset fields are left as they are; the stored feature
/// vector is never touched by an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeUpdate {
    pub name: Option<String>,
    pub sound_url: Option<String>,
    pub levels: Option<Vec<f64>>,
}

impl ChallengeUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sound_url.is_none() && self.levels.is_none()
    }

    /// Validates the fields that are set.
    pub fn validate(&self) -> ChallengeResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(url) = &self.sound_url {
            validate_sound_url(url)?;
        }
        if let Some(levels) = &self.levels {
            validate_levels(levels)?;
        }
        Ok(())
    }

    /// Applies the set fields to a record.
    pub fn apply_to(self, record: &mut ChallengeRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(url) = self.sound_url {
            record.sound_url = url;
        }
        if let Some(levels) = self.levels {
            record.levels = levels;
        }
    }
}

/// A name is non-blank and at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> ChallengeResult<()> {
    if name.trim().is_empty() {
        return Err(ChallengeError::invalid("name", "must not be empty"));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ChallengeError::invalid(
            "name",
            format!("must be at most {} characters, got {}", MAX_NAME_LEN, len),
        ));
    }
    Ok(())
}

/// A sound URL uses one of [`SOUND_URL_SCHEMES`], has something after the
/// scheme, and contains no whitespace.
pub fn validate_sound_url(url: &str) -> ChallengeResult<()> {
    let rest = SOUND_URL_SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .ok_or_else(|| {
            ChallengeError::invalid("sound_url", format!("unsupported URL scheme in '{}'", url))
        })?;

    if rest.is_empty() {
        return Err(ChallengeError::invalid("sound_url", "URL has no location"));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(ChallengeError::invalid("sound_url", "URL must not contain whitespace"));
    }
    Ok(())
}

/// Every level is a finite number in [0, 1].
pub fn validate_levels(levels: &[f64]) -> ChallengeResult<()> {
    if levels
        .iter()
        .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    {
        Ok(())
    } else {
        Err(ChallengeError::invalid("levels", LEVELS_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ChallengeRecord {
        let now = Utc::now();
        ChallengeRecord {
            id: 1,
            name: "Owl".to_string(),
            created_by: "ada".to_string(),
            created_at: now,
            updated_at: now,
            sound_url: "https://sounds.example/owl.wav".to_string(),
            sound_hash: "00".repeat(32),
            levels: vec![0.2, 0.8],
            features: serde_json::json!([0.1, 0.2, 1500.0, 0.5, vec![0.0; 13]]),
        }
    }

    #[test]
    fn test_levels() {
        assert!(validate_levels(&[]).is_ok());
        assert!(validate_levels(&[0.0, 0.5, 1.0]).is_ok());

        let err = validate_levels(&[0.5, 1.5]).unwrap_err();
        assert_eq!(err.code(), "C001");
        assert!(err.to_string().contains(LEVELS_MESSAGE));
        assert!(validate_levels(&[-0.1]).is_err());
        assert!(validate_levels(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Howl like a wolf").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
        // counted in characters, not bytes
        assert!(validate_name(&"é".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_sound_url() {
        assert!(validate_sound_url("https://cdn.example/a.wav").is_ok());
        assert!(validate_sound_url("file:///tmp/a.wav").is_ok());
        assert!(validate_sound_url("ftp://example/a.wav").is_ok());
        assert!(validate_sound_url("ftps://example/a.wav").is_ok());
        assert!(validate_sound_url("gopher://example/a.wav").is_err());
        assert!(validate_sound_url("https://").is_err());
        assert!(validate_sound_url("https://a b").is_err());
    }

    #[test]
    fn test_new_challenge_validation() {
        let ok = NewChallenge::new("Owl", "ada", "https://x/owl.wav").levels(vec![0.3]);
        assert!(ok.validate().is_ok());

        let no_creator = NewChallenge::new("Owl", " ", "https://x/owl.wav");
        assert!(no_creator.validate().is_err());
    }

    #[test]
    fn test_update_leaves_features_alone() {
        let mut rec = record();
        let before = rec.features.clone();
        let update = ChallengeUpdate {
            name: Some("Barn owl".to_string()),
            levels: Some(vec![1.0]),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        update.apply_to(&mut rec);

        assert_eq!(rec.name, "Barn owl");
        assert_eq!(rec.levels, vec![1.0]);
        assert_eq!(rec.sound_url, "https://sounds.example/owl.wav");
        assert_eq!(rec.features, before);
    }

    #[test]
    fn test_record_json_roundtrip_keeps_features_shape() {
        let rec = record();
        let json = serde_json::to_string(&rec).unwrap();
        let back: ChallengeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.features.as_array().unwrap().len(), 5);
        assert_eq!(back.reference_summary().unwrap().centroid, 1500.0);
    }

    #[test]
    fn test_malformed_features_still_load() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["features"] = serde_json::json!([1, 2, 3]);
        let rec: ChallengeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(rec.reference_summary().unwrap_err().code(), "F004");
    }
}
