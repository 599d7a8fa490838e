//! Frame geometry and slicing.
//!
//! Frames are fixed-length windows whose starts advance by a fixed step. A
//! trailing window that would run past the last sample is dropped, so the
//! frame count depends only on the sample count and the geometry.

use crate::config::PipelineConfig;

/// Frame length and step in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Samples per frame.
    pub length: usize,
    /// Samples between consecutive frame starts.
    pub step: usize,
}

impl FrameGeometry {
    /// Derives the geometry for a sample rate, rounding to whole samples.
    pub fn for_rate(sample_rate: u32, config: &PipelineConfig) -> Self {
        Self {
            length: seconds_to_samples(config.frame_seconds, sample_rate),
            step: seconds_to_samples(config.step_seconds, sample_rate),
        }
    }

    /// Returns false if either dimension rounded down to zero.
    pub fn is_usable(&self) -> bool {
        self.length > 0 && self.step > 0
    }

    /// Number of complete frames that fit in `sample_count` samples.
    pub fn frame_count(&self, sample_count: usize) -> usize {
        if !self.is_usable() || sample_count < self.length {
            return 0;
        }
        (sample_count - self.length) / self.step + 1
    }

    /// Iterates over complete frames of `samples`.
    pub fn frames<'a>(&self, samples: &'a [f32]) -> impl Iterator<Item = &'a [f32]> + 'a {
        let length = self.length;
        let step = self.step.max(1);
        (0..self.frame_count(samples.len())).map(move |i| &samples[i * step..i * step + length])
    }
}

fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    let samples = (seconds * sample_rate as f64).round();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_at_44100() {
        let geometry = FrameGeometry::for_rate(44100, &PipelineConfig::default());
        assert_eq!(geometry.length, 2205);
        // 1102.5 rounds away from zero
        assert_eq!(geometry.step, 1103);
    }

    #[test]
    fn test_geometry_at_16000() {
        let geometry = FrameGeometry::for_rate(16000, &PipelineConfig::default());
        assert_eq!(geometry, FrameGeometry { length: 800, step: 400 });
    }

    #[test]
    fn test_low_rate_is_unusable() {
        let geometry = FrameGeometry::for_rate(8, &PipelineConfig::default());
        assert_eq!(geometry.length, 0);
        assert!(!geometry.is_usable());
        assert_eq!(geometry.frame_count(1000), 0);
        assert_eq!(geometry.frames(&[0.0; 1000]).count(), 0);
    }

    #[test]
    fn test_trailing_partial_frame_dropped() {
        let geometry = FrameGeometry { length: 4, step: 2 };
        let samples: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let frames: Vec<&[f32]> = geometry.frames(&samples).collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(frames[2], &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_shorter_than_one_frame() {
        let geometry = FrameGeometry { length: 10, step: 5 };
        assert_eq!(geometry.frame_count(9), 0);
        assert_eq!(geometry.frame_count(10), 1);
    }
}
