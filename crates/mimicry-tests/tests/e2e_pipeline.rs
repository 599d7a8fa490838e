//! End-to-end tests for the feature pipeline: WAV bytes in, summary vector and
//! similarity report out.

use pretty_assertions::assert_eq;

use mimicry_features::{
    compare, compare_stored, extract_summary, extract_summary_with_timeout, FeatureError,
    PipelineConfig, MFCC_COUNT, SUMMARY_LEN,
};
use mimicry_tests::{float_wav, noise, pcm16_wav, silent_wav, sine_wav, tone};

#[test]
fn summary_has_fixed_shape_at_common_rates() {
    for &rate in &[8000u32, 16000, 22050, 44100, 48000] {
        let summary = extract_summary(&sine_wav(440.0, rate, 1.0))
            .unwrap_or_else(|e| panic!("{} Hz: {}", rate, e));
        assert!(summary.is_finite(), "{} Hz produced non-finite values", rate);

        let value = summary.to_value();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), SUMMARY_LEN);
        assert_eq!(items[4].as_array().unwrap().len(), MFCC_COUNT);
    }
}

#[test]
fn silent_second_at_44100() {
    let summary = extract_summary(&silent_wav(44100, 1.0)).unwrap();
    assert!(summary.energy.abs() < 1e-12);
    assert!(summary.zcr.abs() < 1e-12);
}

#[test]
fn empty_signal_is_rejected() {
    let err = extract_summary(&pcm16_wav(44100, &[])).unwrap_err();
    assert_eq!(err, FeatureError::EmptySignal);
}

#[test]
fn zero_length_frames_are_an_extraction_failure() {
    // 0.050 * 8 Hz rounds to zero samples
    let err = extract_summary(&pcm16_wav(8, &[0.5; 100])).unwrap_err();
    assert!(matches!(err, FeatureError::ExtractionFailure { .. }), "{:?}", err);
}

#[test]
fn signal_shorter_than_one_frame_fails() {
    let err = extract_summary(&pcm16_wav(16000, &tone(440.0, 0.5, 16000, 0.03))).unwrap_err();
    assert_eq!(err.code(), "F003");
}

#[test]
fn undecodable_bytes_fail_with_decode_error() {
    let err = extract_summary(b"this is not a wav file").unwrap_err();
    assert!(matches!(err, FeatureError::Decode { .. }));
}

#[test]
fn single_frame_clip_is_valid() {
    let samples = tone(440.0, 0.5, 16000, 0.05);
    assert_eq!(samples.len(), 800);
    let summary = extract_summary(&float_wav(16000, 1, &samples)).unwrap();
    assert!(summary.is_finite());
}

#[test]
fn trailing_partial_frame_is_dropped() {
    let samples = tone(523.0, 0.5, 16000, 0.0625);
    assert_eq!(samples.len(), 1000);

    // 1000 samples hold one 800-sample frame plus a partial one
    let full = extract_summary(&float_wav(16000, 1, &samples)).unwrap();
    let first_frame = extract_summary(&float_wav(16000, 1, &samples[..800])).unwrap();
    assert_eq!(full, first_frame);
}

#[test]
fn only_channel_zero_is_analyzed() {
    let left = tone(660.0, 0.5, 16000, 0.5);
    let right = noise(3, 0.8, left.len());
    let stereo: Vec<f32> = left
        .iter()
        .zip(&right)
        .flat_map(|(l, r)| [*l, *r])
        .collect();

    let mono = extract_summary(&float_wav(16000, 1, &left)).unwrap();
    let from_stereo = extract_summary(&float_wav(16000, 2, &stereo)).unwrap();
    assert_eq!(mono, from_stereo);
}

#[test]
fn centroid_tracks_tone_frequency() {
    let low = extract_summary(&sine_wav(440.0, 16000, 0.5)).unwrap();
    let high = extract_summary(&sine_wav(2000.0, 16000, 0.5)).unwrap();

    assert!((low.centroid - 440.0).abs() < 50.0, "low centroid {}", low.centroid);
    assert!((high.centroid - 2000.0).abs() < 50.0, "high centroid {}", high.centroid);
    assert!(low.zcr < high.zcr);
}

#[test]
fn level_change_only_moves_energy() {
    let loud = extract_summary(&float_wav(16000, 1, &tone(440.0, 0.5, 16000, 0.5))).unwrap();
    let quiet = extract_summary(&float_wav(16000, 1, &tone(440.0, 0.25, 16000, 0.5))).unwrap();
    let report = compare(&loud, &quiet);

    assert!(report.zcr > 0.99);
    assert!(report.centroid > 0.99);
    assert!(report.clarity > 0.99);
    // a quarter of the energy
    assert!((report.energy - 0.25).abs() < 0.01, "energy {}", report.energy);
}

#[test]
fn tone_and_noise_are_dissimilar() {
    let reference = extract_summary(&sine_wav(440.0, 16000, 0.5)).unwrap();
    let probe = extract_summary(&pcm16_wav(16000, &noise(11, 0.5, 8000))).unwrap();
    let report = compare(&reference, &probe);

    assert!(report.centroid < 0.5, "centroid {}", report.centroid);
    assert!(report.zcr < 0.5, "zcr {}", report.zcr);
    assert!(compare(&reference, &reference).mfcc > report.mfcc);
}

#[test]
fn stored_reference_compares_like_in_memory() {
    let reference = extract_summary(&sine_wav(440.0, 22050, 0.5)).unwrap();
    let probe = extract_summary(&sine_wav(470.0, 22050, 0.5)).unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&reference).unwrap()).unwrap();
    assert_eq!(compare_stored(&stored, &probe).unwrap(), compare(&reference, &probe));
}

#[test]
fn self_comparison_scores_one() {
    let summary = extract_summary(&sine_wav(300.0, 16000, 0.75)).unwrap();
    for (feature, score) in compare(&summary, &summary).iter() {
        assert!((score - 1.0).abs() < 1e-9, "{} scored {}", feature, score);
    }
}

#[test]
fn timeout_bounded_extraction_matches_direct() {
    let wav = sine_wav(440.0, 16000, 1.0);
    let config = PipelineConfig::default();
    assert_eq!(
        extract_summary_with_timeout(&wav, &config).unwrap(),
        extract_summary(&wav).unwrap()
    );
}
