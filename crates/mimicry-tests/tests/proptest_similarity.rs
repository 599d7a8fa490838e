//! Property-based tests for similarity scoring and stored-vector parsing.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mimicry-tests --test proptest_similarity
//! ```

use proptest::prelude::*;

use mimicry_features::{
    compare, compare_stored, cosine_similarity, scalar_similarity, SummaryVector, MFCC_COUNT,
};

fn summary_strategy() -> impl Strategy<Value = SummaryVector> {
    (
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..24000.0,
        0.0f64..1.0,
        prop::array::uniform13(-200.0f64..50.0),
    )
        .prop_map(|(zcr, energy, centroid, clarity, mfcc)| SummaryVector {
            zcr,
            energy,
            centroid,
            clarity,
            mfcc,
        })
}

proptest! {
    /// Scalar similarity stays in [0, 1] for every finite pair.
    #[test]
    fn scalar_similarity_is_bounded(a in -1e12f64..1e12, b in -1e12f64..1e12) {
        let score = scalar_similarity(a, b);
        prop_assert!((0.0..=1.0).contains(&score), "({}, {}) -> {}", a, b, score);
    }

    /// Identical non-negative scalars score 1.
    #[test]
    fn scalar_self_similarity(a in 0.0f64..1e9) {
        prop_assert!((scalar_similarity(a, a) - 1.0).abs() < 1e-12);
    }

    /// Cosine similarity is clamped to [0, 1] for any pair of vectors.
    #[test]
    fn cosine_similarity_is_bounded(
        a in prop::collection::vec(-1e6f64..1e6, MFCC_COUNT),
        b in prop::collection::vec(-1e6f64..1e6, MFCC_COUNT),
    ) {
        let score = cosine_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// A summary compared with itself scores 1 on every feature.
    #[test]
    fn compare_self_is_one(v in summary_strategy()) {
        for (feature, score) in compare(&v, &v).iter() {
            prop_assert!((score - 1.0).abs() < 1e-9, "{} scored {}", feature, score);
        }
    }

    /// Every report entry is in [0, 1].
    #[test]
    fn report_entries_are_bounded(a in summary_strategy(), b in summary_strategy()) {
        for (_, score) in compare(&a, &b).iter() {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    /// A stored array with the wrong element count is a malformed reference.
    #[test]
    fn wrong_length_references_are_rejected(
        values in prop::collection::vec(-10.0f64..10.0, 0..12)
            .prop_filter("exactly five elements is the valid shape", |v| v.len() != 5),
        probe in summary_strategy(),
    ) {
        let stored = serde_json::json!(values);
        let err = compare_stored(&stored, &probe).unwrap_err();
        prop_assert_eq!(err.code(), "F004");
    }

    /// A stored MFCC block of the wrong width is a malformed reference.
    #[test]
    fn wrong_mfcc_width_is_rejected(
        width in (0usize..30).prop_filter("13 is the valid width", |w| *w != MFCC_COUNT),
        probe in summary_strategy(),
    ) {
        let stored = serde_json::json!([0.1, 0.2, 1000.0, 0.5, vec![0.0; width]]);
        prop_assert_eq!(compare_stored(&stored, &probe).unwrap_err().code(), "F004");
    }

    /// Persisting and reloading a summary preserves every component.
    #[test]
    fn stored_form_reloads_exactly(v in summary_strategy()) {
        let text = serde_json::to_string(&v).unwrap();
        let back: SummaryVector = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(back, v);
    }
}
