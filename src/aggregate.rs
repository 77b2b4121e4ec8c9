//! Ad-level aggregation
//!
//! Pure functions combining per-comment scores into ad-level metrics. No
//! retries, no state: failure handling belongs upstream in model inference.

use crate::types::{AdAggregate, Analytics};

/// Weight of the toxicity complement in the engagement heuristic
///
/// Tunable constant, not a learned parameter.
pub const ENGAGEMENT_TOXICITY_WEIGHT: f32 = 0.3;

/// Combine per-comment scores into the ad-level aggregate
///
/// An empty score list yields the explicit default (mean 0.0, index 0.5)
/// rather than NaN.
pub fn aggregate(comment_scores: &[f32]) -> AdAggregate {
    let mean_sentiment = if comment_scores.is_empty() {
        0.0
    } else {
        comment_scores.iter().sum::<f32>() / comment_scores.len() as f32
    };

    AdAggregate {
        mean_sentiment,
        receptiveness_index: (mean_sentiment + 1.0) / 2.0,
    }
}

/// Mean toxicity across comments, 0.0 for an empty list
pub fn mean_toxicity(toxicities: &[f32]) -> f32 {
    if toxicities.is_empty() {
        0.0
    } else {
        toxicities.iter().sum::<f32>() / toxicities.len() as f32
    }
}

/// Derive the presentation analytics from aggregate inputs
///
/// - `quality`: magnitude of the mean sentiment — a strongly negative
///   reaction is a high-quality (unambiguous) signal, not a good one.
/// - `hostility`: average toxicity, passed through.
/// - `engagement`: sentiment strength plus a partial credit for low
///   toxicity, clamped.
/// - `resonance`: the regressor's raw prediction clamped to [0, 1].
pub fn derive_analytics(
    mean_sentiment: f32,
    avg_toxicity: f32,
    predicted_resonance: f32,
) -> Analytics {
    Analytics {
        quality: mean_sentiment.abs().clamp(0.0, 1.0),
        hostility: avg_toxicity.clamp(0.0, 1.0),
        engagement: (mean_sentiment.abs() + ENGAGEMENT_TOXICITY_WEIGHT * (1.0 - avg_toxicity))
            .clamp(0.0, 1.0),
        resonance: predicted_resonance.clamp(0.0, 1.0),
    }
}
