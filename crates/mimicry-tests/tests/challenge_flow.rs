//! Challenge lifecycle against a directory-backed store: create, verify,
//! update, delete, and staging-file cleanup.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use mimicry_challenge::{
    ChallengeError, ChallengeService, ChallengeUpdate, JsonDirStore, NewChallenge, RecordStore,
};
use mimicry_features::PipelineConfig;
use mimicry_tests::{noise, pcm16_wav, sine_wav};

fn service(store_dir: &Path, staging: &Path) -> ChallengeService<JsonDirStore> {
    let store = JsonDirStore::open(store_dir).unwrap();
    ChallengeService::new(store, PipelineConfig::default()).with_staging_dir(staging)
}

fn staged_files(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

fn owl() -> NewChallenge {
    NewChallenge::new("Owl hoot", "ada", "https://sounds.example/owl.wav").levels(vec![0.1, 0.9])
}

#[test]
fn create_then_verify_identical_attempt() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(&root.path().join("store"), staging.path());

    let reference = sine_wav(440.0, 16000, 1.0);
    let record = svc.create(owl(), &reference).unwrap();
    assert!(root
        .path()
        .join("store")
        .join(format!("challenge-{}.json", record.id))
        .exists());

    let outcome = svc.verify(record.id, &reference).unwrap();
    assert!((outcome.mean_score - 1.0).abs() < 1e-9);
    assert!(outcome.passes(0.99));
    assert_eq!(staged_files(staging.path()), 0);
}

#[test]
fn different_attempt_scores_lower() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());

    let record = svc.create(owl(), &sine_wav(440.0, 16000, 1.0)).unwrap();
    let attempt = pcm16_wav(16000, &noise(5, 0.5, 16000));
    let outcome = svc.verify(record.id, &attempt).unwrap();

    assert!(outcome.mean_score < 0.9, "mean {}", outcome.mean_score);
    assert_eq!(staged_files(staging.path()), 0);
}

#[test]
fn concurrent_attempts_on_one_challenge_do_not_collide() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());
    let record = svc.create(owl(), &sine_wav(440.0, 16000, 0.5)).unwrap();

    let svc = &svc;
    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let attempt = sine_wav(400.0 + 20.0 * i as f32, 16000, 0.5);
                scope.spawn(move || svc.verify(record.id, &attempt))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for outcome in outcomes {
        assert_eq!(outcome.unwrap().challenge_id, record.id);
    }
    assert_eq!(staged_files(staging.path()), 0);
}

#[test]
fn damaged_reference_is_reported_and_staging_cleaned() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());
    let audio = sine_wav(440.0, 16000, 0.5);
    let record = svc.create(owl(), &audio).unwrap();

    // truncate the stored vector to four elements
    let path = svc.store().record_path(record.id);
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["features"] = serde_json::json!([0.1, 0.2, 1500.0, 0.5]);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let err = svc.verify(record.id, &audio).unwrap_err();
    assert_eq!(err.code(), "C004");
    assert_eq!(err.root_code(), "F004");
    assert_eq!(staged_files(staging.path()), 0);
}

#[test]
fn unusable_attempt_fails_cleanly() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());
    let record = svc.create(owl(), &sine_wav(440.0, 16000, 0.5)).unwrap();

    let err = svc.verify(record.id, &pcm16_wav(16000, &[])).unwrap_err();
    assert_eq!(err.root_code(), "F002");
    assert_eq!(staged_files(staging.path()), 0);
}

#[test]
fn records_survive_reopen_and_updates_keep_features() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();

    let created = {
        let mut svc = service(root.path(), staging.path());
        svc.create(owl(), &sine_wav(440.0, 16000, 0.5)).unwrap()
    };

    let mut svc = service(root.path(), staging.path());
    assert_eq!(svc.get(created.id).unwrap(), created);

    let updated = svc
        .update(
            created.id,
            ChallengeUpdate {
                levels: Some(vec![0.0, 1.0]),
                sound_url: Some("file:///srv/owl.wav".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.features, created.features);
    assert_eq!(updated.sound_hash, created.sound_hash);
    assert_eq!(svc.get(created.id).unwrap().levels, vec![0.0, 1.0]);

    let second = svc
        .create(
            NewChallenge::new("Cat", "bo", "https://sounds.example/cat.wav"),
            &sine_wav(880.0, 16000, 0.5),
        )
        .unwrap();
    assert_eq!(second.id, created.id + 1);

    let names: Vec<String> = svc.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Owl hoot".to_string(), "Cat".to_string()]);
}

#[test]
fn invalid_updates_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());
    let record = svc.create(owl(), &sine_wav(440.0, 16000, 0.5)).unwrap();

    let err = svc
        .update(
            record.id,
            ChallengeUpdate {
                levels: Some(vec![0.5, -0.5]),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ChallengeError::InvalidRecord { field: "levels", .. }));
    assert!(err
        .to_string()
        .contains("All values in levels must be floating-point numbers between 0 and 1."));
    assert_eq!(svc.get(record.id).unwrap().levels, vec![0.1, 0.9]);
}

#[test]
fn delete_removes_the_record_file() {
    let root = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    let mut svc = service(root.path(), staging.path());
    let record = svc.create(owl(), &sine_wav(440.0, 16000, 0.5)).unwrap();

    svc.delete(record.id).unwrap();
    assert!(!svc.store().record_path(record.id).exists());
    assert!(svc.store().list().unwrap().is_empty());
    assert!(matches!(
        svc.verify(record.id, &sine_wav(440.0, 16000, 0.5)),
        Err(ChallengeError::NotFound { .. })
    ));
}
