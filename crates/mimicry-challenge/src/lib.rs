//! Mimicry Challenges
//!
//! Voice challenges pair a reference recording with its stored summary vector.
//! Users later submit attempts, which are scored against that reference.
//!
//! - [`record`] - The challenge record and field validation
//! - [`store`] - The [`RecordStore`] seam with in-memory and JSON-directory stores
//! - [`service`] - Create, update, delete and verify operations
//! - [`verify`] - Scoring an attempt with a staged, always-removed temp file
//!
//! ```ignore
//! use mimicry_challenge::{ChallengeService, JsonDirStore, NewChallenge};
//! use mimicry_features::PipelineConfig;
//!
//! let store = JsonDirStore::open("challenges")?;
//! let mut service = ChallengeService::new(store, PipelineConfig::default());
//! let owl = service.create(
//!     NewChallenge::new("Owl", "ada", "https://sounds.example/owl.wav"),
//!     &std::fs::read("owl.wav")?,
//! )?;
//! let outcome = service.verify(owl.id, &std::fs::read("attempt.wav")?)?;
//! println!("mean score {:.2}", outcome.mean_score);
//! ```

pub mod error;
pub mod record;
pub mod service;
pub mod store;
pub mod verify;

pub use error::{ChallengeError, ChallengeResult};
pub use record::{
    validate_levels, validate_name, validate_sound_url, ChallengeRecord, ChallengeUpdate,
    NewChallenge, MAX_NAME_LEN,
};
pub use service::ChallengeService;
pub use store::{JsonDirStore, MemoryStore, RecordStore};
pub use verify::VerificationOutcome;
