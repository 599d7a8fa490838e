//! Mimicry CLI library.
//!
//! Command implementations for the `mimicry` binary: feature extraction,
//! summary comparison, challenge management and voice verification.

pub mod commands;
