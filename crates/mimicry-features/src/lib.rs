//! Mimicry Feature Pipeline
//!
//! This crate turns a `.wav` clip into a fixed-shape summary of its short-term
//! audio features, and scores one summary against another.
//!
//! # Pipeline
//!
//! ```text
//! wav bytes -> decode_wav -> AudioSignal
//!           -> extract_frame_features -> FrameFeatures (frames x 21)
//!           -> reduce -> SummaryVector [zcr, energy, centroid, clarity, [mfcc; 13]]
//! ```
//!
//! A stored reference vector and a freshly extracted probe vector are compared
//! with [`compare`], which yields a per-feature [`SimilarityReport`]. The crate
//! does not decide whether a report is a "match"; that policy belongs to the caller.
//!
//! # Determinism
//!
//! Extraction is a pure function of the input bytes and the [`PipelineConfig`].
//! No state is kept between calls, so concurrent callers never share anything.
//!
//! # Example
//!
//! ```ignore
//! use mimicry_features::{compare, extract_summary};
//!
//! let reference = extract_summary(&std::fs::read("reference.wav")?)?;
//! let probe = extract_summary(&std::fs::read("attempt.wav")?)?;
//! let report = compare(&reference, &probe);
//! println!("mfcc similarity: {:.3}", report.mfcc);
//! ```
//!
//! # Crate Structure
//!
//! - [`signal`] - Decoded mono audio and the WAV decoder adapter
//! - [`frames`] - Frame geometry and slicing
//! - [`temporal`] - Time-domain descriptors (zcr, energy, energy entropy)
//! - [`spectral`] - Magnitude spectrum and spectral descriptors
//! - [`mfcc`] - Mel filterbank and cepstral coefficients
//! - [`extract`] - The per-frame feature matrix
//! - [`summary`] - Reduction to the persisted summary vector
//! - [`similarity`] - Per-feature similarity scoring
//! - [`pipeline`] - Validation gate and timeout-bounded entry points

pub mod config;
pub mod error;
pub mod extract;
pub mod frames;
pub mod mfcc;
pub mod pipeline;
pub mod signal;
pub mod similarity;
pub mod spectral;
pub mod summary;
pub mod temporal;

pub use config::PipelineConfig;
pub use error::{FeatureError, FeatureResult};
pub use extract::{extract_frame_features, FrameFeatures, FEATURE_COUNT};
pub use pipeline::{
    extract_summary, extract_summary_with, extract_summary_with_timeout, summarize_signal,
    with_timeout,
};
pub use signal::{decode_wav, decode_wav_file, AudioSignal};
pub use similarity::{
    compare, compare_stored, cosine_similarity, scalar_similarity, Feature, SimilarityReport,
};
pub use summary::{reduce, SummaryVector, MFCC_COUNT, SUMMARY_LEN};
