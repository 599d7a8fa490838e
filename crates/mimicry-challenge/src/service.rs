//! Challenge lifecycle operations over a [`RecordStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;

use mimicry_features::{extract_summary_with_timeout, PipelineConfig};

use crate::error::{ChallengeError, ChallengeResult};
use crate::record::{ChallengeRecord, ChallengeUpdate, NewChallenge};
use crate::store::RecordStore;
use crate::verify::{verify_record, VerificationOutcome};

/// Creates, edits and verifies challenges.
pub struct ChallengeService<S: RecordStore> {
    store: S,
    config: PipelineConfig,
    staging_dir: PathBuf,
}

impl<S: RecordStore> ChallengeService<S> {
    /// Creates a service that stages uploads in the system temp directory.
    pub fn new(store: S, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Sets the directory used to stage uploaded attempts.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Validates `new`, extracts the reference vector from `reference_audio`
    /// and stores the record.
    pub fn create(
        &mut self,
        new: NewChallenge,
        reference_audio: &[u8],
    ) -> ChallengeResult<ChallengeRecord> {
        new.validate()?;
        let summary = extract_summary_with_timeout(reference_audio, &self.config)?;

        let now = Utc::now();
        let record = ChallengeRecord {
            id: self.store.next_id()?,
            name: new.name,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
            sound_url: new.sound_url,
            sound_hash: blake3::hash(reference_audio).to_hex().to_string(),
            levels: new.levels,
            features: summary.to_value(),
        };
        self.store.insert(record.clone())?;
        log::info!("created challenge {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Applies a partial update. The stored feature vector is left unchanged.
    pub fn update(&mut self, id: u64, update: ChallengeUpdate) -> ChallengeResult<ChallengeRecord> {
        update.validate()?;
        let mut record = self.get(id)?;
        if update.is_empty() {
            return Ok(record);
        }

        update.apply_to(&mut record);
        record.updated_at = Utc::now().max(record.created_at);
        self.store.update(record.clone())?;
        log::info!("updated challenge {}", id);
        Ok(record)
    }

    pub fn get(&self, id: u64) -> ChallengeResult<ChallengeRecord> {
        self.store.get(id)?.ok_or(ChallengeError::NotFound { id })
    }

    pub fn list(&self) -> ChallengeResult<Vec<ChallengeRecord>> {
        self.store.list()
    }

    /// Deletes a challenge and returns the removed record.
    pub fn delete(&mut self, id: u64) -> ChallengeResult<ChallengeRecord> {
        let record = self.store.delete(id)?;
        log::info!("deleted challenge {}", id);
        Ok(record)
    }

    /// Scores an uploaded attempt (WAV bytes) against challenge `id`.
    pub fn verify(&self, id: u64, voice: &[u8]) -> ChallengeResult<VerificationOutcome> {
        let record = self.get(id)?;
        verify_record(&record, voice, &self.config, &self.staging_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::io::Cursor;

    fn tone_wav(freq: f32, seconds: f32) -> Vec<u8> {
        let sample_rate = 16000;
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            let len = (sample_rate as f32 * seconds) as usize;
            for i in 0..len {
                let t = i as f32 / sample_rate as f32;
                let s = (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5;
                writer.write_sample((s * 32767.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn service(staging: &Path) -> ChallengeService<MemoryStore> {
        ChallengeService::new(MemoryStore::new(), PipelineConfig::default())
            .with_staging_dir(staging)
    }

    fn owl() -> NewChallenge {
        NewChallenge::new("Owl", "ada", "https://sounds.example/owl.wav").levels(vec![0.25, 0.75])
    }

    #[test]
    fn test_create_stores_summary_and_hash() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let audio = tone_wav(440.0, 0.5);

        let record = svc.create(owl(), &audio).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.features.as_array().unwrap().len(), 5);
        assert_eq!(record.sound_hash, blake3::hash(&audio).to_hex().to_string());
        assert_eq!(svc.get(1).unwrap(), record);
    }

    #[test]
    fn test_create_rejects_bad_levels_before_extraction() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let err = svc
            .create(owl().levels(vec![2.0]), b"not audio")
            .unwrap_err();
        assert_eq!(err.code(), "C001");
        assert!(svc.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_bad_audio() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let err = svc.create(owl(), b"not audio").unwrap_err();
        assert_eq!(err.root_code(), "F001");
    }

    #[test]
    fn test_update_keeps_features() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let created = svc.create(owl(), &tone_wav(440.0, 0.5)).unwrap();

        let updated = svc
            .update(
                created.id,
                ChallengeUpdate {
                    name: Some("Snowy owl".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Snowy owl");
        assert_eq!(updated.features, created.features);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let err = svc.update(99, ChallengeUpdate::default()).unwrap_err();
        assert_eq!(err.code(), "C002");
    }

    #[test]
    fn test_verify_same_audio_scores_one() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let audio = tone_wav(440.0, 0.5);
        let record = svc.create(owl(), &audio).unwrap();

        let outcome = svc.verify(record.id, &audio).unwrap();
        assert_eq!(outcome.challenge_id, record.id);
        for (feature, score) in outcome.report.iter() {
            assert!((score - 1.0).abs() < 1e-9, "{} scored {}", feature, score);
        }
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_verify_cleans_up_on_failure() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let record = svc.create(owl(), &tone_wav(440.0, 0.5)).unwrap();

        let err = svc.verify(record.id, b"garbage").unwrap_err();
        assert_eq!(err.root_code(), "F001");
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_verify_unknown_challenge() {
        let staging = tempfile::tempdir().unwrap();
        let svc = service(staging.path());
        let err = svc.verify(5, &tone_wav(440.0, 0.5)).unwrap_err();
        assert_eq!(err.code(), "C002");
    }

    #[test]
    fn test_delete() {
        let staging = tempfile::tempdir().unwrap();
        let mut svc = service(staging.path());
        let record = svc.create(owl(), &tone_wav(440.0, 0.5)).unwrap();
        assert_eq!(svc.delete(record.id).unwrap().id, record.id);
        assert_eq!(svc.get(record.id).unwrap_err().code(), "C002");
    }
}
