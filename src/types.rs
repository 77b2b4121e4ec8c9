//! Core data structures shared across the scoring pipeline

use crate::error::{AdPulseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-way comment sentiment label
///
/// The index order (negative = 0, neutral = 1, positive = 2) is part of the
/// classifier's contract: probabilities are always reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Number of sentiment classes
    pub const COUNT: usize = 3;

    /// Class index used in one-hot encodings and probability vectors
    pub fn index(self) -> usize {
        match self {
            SentimentLabel::Negative => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Positive => 2,
        }
    }

    /// Parse a dataset label string
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "negative" | "neg" => Ok(SentimentLabel::Negative),
            "neutral" | "neu" => Ok(SentimentLabel::Neutral),
            "positive" | "pos" => Ok(SentimentLabel::Positive),
            other => Err(AdPulseError::Dataset(format!(
                "Unknown sentiment label: '{}'",
                other
            ))),
        }
    }
}

/// Calibrated class probabilities from the sentiment classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentProbs {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl SentimentProbs {
    /// Scalar sentiment score in [-1, 1]
    ///
    /// `p_pos - p_neg` rather than argmax or `p_pos` alone: unambiguous
    /// positivity is rewarded, unambiguous negativity penalized, and
    /// uncertain or neutral comments wash toward 0.
    pub fn score(&self) -> f32 {
        self.positive - self.negative
    }

    /// Most probable class
    pub fn argmax(&self) -> SentimentLabel {
        if self.negative >= self.neutral && self.negative >= self.positive {
            SentimentLabel::Negative
        } else if self.positive >= self.neutral {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Per-comment scoring result (ephemeral, discarded after aggregation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentScore {
    /// Index of the comment within the ad's comment list
    pub index: usize,
    /// Class probabilities
    pub probs: SentimentProbs,
    /// Scalar score in [-1, 1]
    pub score: f32,
    /// Toxicity probability captured during feature extraction
    pub toxicity: f32,
}

/// Ad-level aggregate of comment scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdAggregate {
    /// Mean of comment scores, 0.0 when no comments were scored
    pub mean_sentiment: f32,
    /// `(mean_sentiment + 1) / 2`, always in [0, 1]
    pub receptiveness_index: f32,
}

/// Derived ad analytics, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Magnitude of the mean sentiment (unambiguity, not goodness)
    pub quality: f32,
    /// Average toxicity across scored comments
    pub hostility: f32,
    /// Heuristic blend of sentiment strength and toxicity complement
    pub engagement: f32,
    /// Model-predicted receptiveness, clamped
    pub resonance: f32,
}

/// Full ad-level scoring report, the only value intended to persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdReport {
    pub ad_id: String,
    pub ad_text: String,
    pub mean_sentiment: f32,
    pub receptiveness_index: f32,
    pub analytics: Analytics,
    /// Per-comment scores as produced before aggregation
    pub comment_scores: Vec<CommentScore>,
    /// Number of comments that failed scoring and were dropped
    pub comments_dropped: usize,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_indices() {
        assert_eq!(SentimentLabel::Negative.index(), 0);
        assert_eq!(SentimentLabel::Neutral.index(), 1);
        assert_eq!(SentimentLabel::Positive.index(), 2);
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(
            SentimentLabel::parse("Positive").unwrap(),
            SentimentLabel::Positive
        );
        assert_eq!(
            SentimentLabel::parse("neg").unwrap(),
            SentimentLabel::Negative
        );
        assert!(SentimentLabel::parse("meh").is_err());
    }

    #[test]
    fn test_score_sign_convention() {
        let confident_positive = SentimentProbs {
            negative: 0.05,
            neutral: 0.05,
            positive: 0.9,
        };
        assert!(confident_positive.score() > 0.8);

        let uncertain = SentimentProbs {
            negative: 0.33,
            neutral: 0.34,
            positive: 0.33,
        };
        assert!(uncertain.score().abs() < 0.01);
    }

    #[test]
    fn test_argmax() {
        let probs = SentimentProbs {
            negative: 0.1,
            neutral: 0.7,
            positive: 0.2,
        };
        assert_eq!(probs.argmax(), SentimentLabel::Neutral);
    }
}
