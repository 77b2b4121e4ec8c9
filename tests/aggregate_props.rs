//! Property tests for the aggregation arithmetic

use adpulse::aggregate::{aggregate, derive_analytics, mean_toxicity};
use proptest::prelude::*;

proptest! {
    #[test]
    fn aggregate_stays_in_bounds(scores in prop::collection::vec(-1.0f32..=1.0, 0..64)) {
        let agg = aggregate(&scores);
        prop_assert!((-1.0..=1.0).contains(&agg.mean_sentiment));
        prop_assert!((0.0..=1.0).contains(&agg.receptiveness_index));
    }

    #[test]
    fn index_is_affine_in_mean(scores in prop::collection::vec(-1.0f32..=1.0, 1..64)) {
        let agg = aggregate(&scores);
        prop_assert!((agg.receptiveness_index - (agg.mean_sentiment + 1.0) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn adding_a_positive_comment_never_lowers_the_index(
        scores in prop::collection::vec(-1.0f32..=1.0, 1..32),
    ) {
        let before = aggregate(&scores);

        let mut extended = scores.clone();
        extended.push(1.0);
        let after = aggregate(&extended);

        prop_assert!(after.receptiveness_index >= before.receptiveness_index - 1e-6);
    }

    #[test]
    fn analytics_always_land_in_unit_interval(
        mean in -1.0f32..=1.0,
        tox in 0.0f32..=1.0,
        resonance in -5.0f32..=5.0,
    ) {
        let a = derive_analytics(mean, tox, resonance);
        prop_assert!((0.0..=1.0).contains(&a.quality));
        prop_assert!((0.0..=1.0).contains(&a.hostility));
        prop_assert!((0.0..=1.0).contains(&a.engagement));
        prop_assert!((0.0..=1.0).contains(&a.resonance));
    }

    #[test]
    fn quality_ignores_sentiment_direction(mean in 0.0f32..=1.0, tox in 0.0f32..=1.0) {
        let pos = derive_analytics(mean, tox, 0.5);
        let neg = derive_analytics(-mean, tox, 0.5);
        prop_assert_eq!(pos.quality, neg.quality);
    }

    #[test]
    fn mean_toxicity_bounded_by_inputs(tox in prop::collection::vec(0.0f32..=1.0, 1..32)) {
        let mean = mean_toxicity(&tox);
        let min = tox.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = tox.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);
    }
}

#[test]
fn empty_inputs_use_explicit_defaults() {
    let agg = aggregate(&[]);
    assert_eq!(agg.mean_sentiment, 0.0);
    assert_eq!(agg.receptiveness_index, 0.5);
    assert_eq!(mean_toxicity(&[]), 0.0);
}
