//! Feature extraction
//!
//! Turns one text into a fixed-length numeric vector: the semantic embedding
//! followed by four handcrafted scalars. The concatenation order is a trained
//! contract — models are fitted against this exact layout — so the layout is
//! captured in a versioned [`FeatureSchema`] that is persisted inside every
//! model artifact and checked before inference.

use crate::analysis::PolarityLexicon;
use crate::embeddings::TextEmbedder;
use crate::error::{AdPulseError, Result};
use crate::services::ToxicityScorer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Current feature schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Scalar features appended after the embedding, in order
pub const SCALAR_FEATURES: [&str; 4] = [
    "sentiment_polarity",
    "emoji_count",
    "question_flag",
    "toxicity_score",
];

/// Versioned description of the feature vector layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Schema version tag
    pub version: u32,
    /// Embedding model the vector was built with
    pub embedding_model: String,
    /// Embedding dimensionality
    pub embedding_dim: usize,
    /// Names of the scalar features, in concatenation order
    pub scalar_features: Vec<String>,
}

impl FeatureSchema {
    /// Schema for the given embedding model
    pub fn new(embedding_model: &str, embedding_dim: usize) -> Self {
        Self {
            version: SCHEMA_VERSION,
            embedding_model: embedding_model.to_string(),
            embedding_dim,
            scalar_features: SCALAR_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Total feature vector length (embedding dims + scalars)
    pub fn len(&self) -> usize {
        self.embedding_dim + self.scalar_features.len()
    }

    /// True when the schema describes an empty vector (never in practice)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify another schema matches this one exactly
    ///
    /// A mismatch means a model would silently misinterpret feature columns,
    /// so this fails rather than guessing.
    pub fn check_compatible(&self, other: &FeatureSchema) -> Result<()> {
        if self != other {
            return Err(AdPulseError::FeatureSchema {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }

    /// Position of a named scalar within the full feature vector
    pub fn scalar_position(&self, name: &str) -> Option<usize> {
        self.scalar_features
            .iter()
            .position(|s| s == name)
            .map(|i| self.embedding_dim + i)
    }

    /// Verify a raw vector has the length this schema requires
    pub fn check_len(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.len() {
            return Err(AdPulseError::FeatureSchema {
                expected: self.len(),
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// A feature vector with the schema it was produced under
#[derive(Debug, Clone)]
pub struct FeatureVector {
    pub values: Vec<f32>,
    pub schema: FeatureSchema,
}

impl FeatureVector {
    /// Toxicity scalar captured during extraction
    pub fn toxicity(&self) -> f32 {
        self.schema
            .scalar_position("toxicity_score")
            .and_then(|i| self.values.get(i).copied())
            .unwrap_or(0.0)
    }
}

/// Count emoji characters in a text
///
/// Covers the common emoji blocks (emoticons, pictographs, transport,
/// supplemental symbols) plus a few BMP singletons like ❤ and ✨.
pub fn emoji_count(text: &str) -> usize {
    text.chars()
        .filter(|&c| {
            matches!(u32::from(c),
                0x1F300..=0x1F5FF   // symbols & pictographs
                | 0x1F600..=0x1F64F // emoticons
                | 0x1F680..=0x1F6FF // transport & map
                | 0x1F900..=0x1F9FF // supplemental symbols
                | 0x1FA70..=0x1FAFF // extended-A
                | 0x2600..=0x27BF   // misc symbols & dingbats
                | 0x2764            // heavy black heart
                | 0x2728            // sparkles
            )
        })
        .count()
}

/// Whether the text asks a question
pub fn question_flag(text: &str) -> bool {
    text.contains('?')
}

/// Combines the embedding service with local scalar features
///
/// Pure given its loaded services; safe to call concurrently. If the
/// embedding or toxicity call fails the extraction fails loudly — a
/// zero-filled vector would silently degrade every downstream prediction.
pub struct FeatureExtractor {
    embedder: Arc<dyn TextEmbedder>,
    toxicity: Arc<dyn ToxicityScorer>,
    lexicon: PolarityLexicon,
    schema: FeatureSchema,
}

impl FeatureExtractor {
    /// Create an extractor over the given services
    pub fn new(embedder: Arc<dyn TextEmbedder>, toxicity: Arc<dyn ToxicityScorer>) -> Self {
        let schema = FeatureSchema::new(embedder.model_name(), embedder.dimensions());
        Self {
            embedder,
            toxicity,
            lexicon: PolarityLexicon::new(),
            schema,
        }
    }

    /// The schema this extractor produces
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Extract the full feature vector for one text
    pub async fn extract(&self, text: &str) -> Result<FeatureVector> {
        let embedding = self.embedder.embed(text).await?;
        let toxicity = self.toxicity.score(text).await?;

        let polarity = self.lexicon.polarity(text);
        let emojis = emoji_count(text) as f32;
        let question = if question_flag(text) { 1.0 } else { 0.0 };

        let mut values = embedding;
        values.push(polarity);
        values.push(emojis);
        values.push(question);
        values.push(toxicity);

        self.schema.check_len(&values)?;

        debug!(
            "Extracted {}-dim feature vector (polarity {:.2}, toxicity {:.2})",
            values.len(),
            polarity,
            toxicity
        );

        Ok(FeatureVector {
            values,
            schema: self.schema.clone(),
        })
    }

    /// Embedding only, used for ad-level text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embed(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_length() {
        let schema = FeatureSchema::new("all-MiniLM-L6-v2", 384);
        assert_eq!(schema.len(), 388);
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let a = FeatureSchema::new("all-MiniLM-L6-v2", 384);
        let b = FeatureSchema::new("bge-base-en-v1.5", 768);
        assert!(a.check_compatible(&b).is_err());
        assert!(a.check_compatible(&a.clone()).is_ok());
    }

    #[test]
    fn test_check_len() {
        let schema = FeatureSchema::new("all-MiniLM-L6-v2", 4);
        assert!(schema.check_len(&[0.0; 8]).is_ok());
        let err = schema.check_len(&[0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            AdPulseError::FeatureSchema {
                expected: 8,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_toxicity_tracks_schema_position() {
        let schema = FeatureSchema::new("all-MiniLM-L6-v2", 2);
        assert_eq!(schema.scalar_position("toxicity_score"), Some(5));
        assert_eq!(schema.scalar_position("sentiment_polarity"), Some(2));
        assert_eq!(schema.scalar_position("unknown"), None);

        let fv = FeatureVector {
            values: vec![0.1, 0.2, -0.5, 2.0, 1.0, 0.7],
            schema: schema.clone(),
        };
        assert_eq!(fv.toxicity(), 0.7);

        // A reordered schema still resolves the right slot by name
        let mut reordered = schema;
        reordered.scalar_features.swap(0, 3);
        let fv = FeatureVector {
            values: vec![0.1, 0.2, 0.7, 2.0, 1.0, -0.5],
            schema: reordered,
        };
        assert_eq!(fv.toxicity(), 0.7);
    }

    #[test]
    fn test_emoji_count() {
        assert_eq!(emoji_count("no emoji here"), 0);
        assert_eq!(emoji_count("love it 😍🔥"), 2);
        assert_eq!(emoji_count("❤"), 1);
    }

    #[test]
    fn test_question_flag() {
        assert!(question_flag("Is the sole durable enough for running?"));
        assert!(!question_flag("Great shoes."));
    }
}
