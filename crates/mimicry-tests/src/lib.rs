//! Mimicry End-to-End Test Infrastructure
//!
//! This crate holds integration tests for the feature pipeline, the challenge
//! layer and the CLI commands, plus the fixtures they share.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mimicry-tests
//! cargo test -p mimicry-tests --test proptest_similarity
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
pub use fixtures::{float_wav, noise, pcm16_wav, silent_wav, sine_wav, tone, write_fixture};
