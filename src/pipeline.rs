//! Ad scoring pipeline
//!
//! [`ScoringPipeline`] is the application context: constructed once at
//! startup from a [`PipelineConfig`], it owns the embedding and toxicity
//! services, the feature extractor, and both loaded models, and is injected
//! into every inference call. Construction fails if either model artifact is
//! missing or incompatible — the pipeline never serves with a partially
//! loaded model.

use crate::aggregate::{aggregate, derive_analytics, mean_toxicity};
use crate::config::{PartialFailurePolicy, PipelineConfig};
use crate::embeddings::{build_embedder, TextEmbedder};
use crate::error::{AdPulseError, Result};
use crate::features::FeatureExtractor;
use crate::model::{artifact, ReceptivenessModel, SentimentModel};
use crate::services::{HttpToxicityScorer, ToxicityScorer};
use crate::types::{AdReport, CommentScore};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// The fully assembled scoring pipeline
pub struct ScoringPipeline {
    extractor: Arc<FeatureExtractor>,
    sentiment: Arc<SentimentModel>,
    receptiveness: Arc<ReceptivenessModel>,
    semaphore: Arc<Semaphore>,
    partial_failure: PartialFailurePolicy,
}

impl std::fmt::Debug for ScoringPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPipeline")
            .field("partial_failure", &self.partial_failure)
            .finish_non_exhaustive()
    }
}

impl ScoringPipeline {
    /// Build the pipeline from configuration, loading model artifacts
    pub async fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let embedder = build_embedder(&config.embedding).await?;
        let toxicity: Arc<dyn ToxicityScorer> =
            Arc::new(HttpToxicityScorer::new(&config.toxicity)?);

        let sentiment = artifact::load_sentiment(&config.artifacts.sentiment_model)?;
        let receptiveness = artifact::load_receptiveness(&config.artifacts.receptiveness_model)?;

        Self::assemble(
            embedder,
            toxicity,
            sentiment,
            receptiveness,
            config.scoring.max_concurrency,
            config.scoring.partial_failure,
        )
    }

    /// Assemble from already-constructed parts
    ///
    /// Used by tests to inject service doubles and by training flows that
    /// hold freshly fitted models.
    pub fn assemble(
        embedder: Arc<dyn TextEmbedder>,
        toxicity: Arc<dyn ToxicityScorer>,
        sentiment: SentimentModel,
        receptiveness: ReceptivenessModel,
        max_concurrency: usize,
        partial_failure: PartialFailurePolicy,
    ) -> Result<Self> {
        let extractor = FeatureExtractor::new(embedder.clone(), toxicity);

        // Fail at startup, not on the first inference call
        extractor.schema().check_compatible(sentiment.schema())?;
        if receptiveness.embedding_dim() != embedder.dimensions() {
            return Err(AdPulseError::FeatureSchema {
                expected: receptiveness.embedding_dim(),
                actual: embedder.dimensions(),
            });
        }

        info!(
            "Scoring pipeline ready: {} ({} dims), max concurrency {}",
            embedder.model_name(),
            embedder.dimensions(),
            max_concurrency
        );

        Ok(Self {
            extractor: Arc::new(extractor),
            sentiment: Arc::new(sentiment),
            receptiveness: Arc::new(receptiveness),
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
            partial_failure,
        })
    }

    /// The feature extractor (shared with training flows)
    pub fn extractor(&self) -> &Arc<FeatureExtractor> {
        &self.extractor
    }

    /// Score a single comment
    pub async fn score_comment(&self, index: usize, text: &str) -> Result<CommentScore> {
        let features = self.extractor.extract(text).await?;
        let probs = self.sentiment.predict_proba(&features)?;

        Ok(CommentScore {
            index,
            probs,
            score: probs.score(),
            toxicity: features.toxicity(),
        })
    }

    /// Score an ad and its comments, producing the full report
    ///
    /// Comments are scored concurrently up to the configured limit; the
    /// aggregation waits for every comment to finish (a join, not a stream).
    pub async fn score_ad(&self, ad_id: &str, ad_text: &str, comments: &[String]) -> Result<AdReport> {
        let mut tasks = JoinSet::new();

        for (index, comment) in comments.iter().enumerate() {
            let extractor = Arc::clone(&self.extractor);
            let sentiment = Arc::clone(&self.sentiment);
            let semaphore = Arc::clone(&self.semaphore);
            let comment = comment.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| AdPulseError::Other(format!("Semaphore closed: {}", e)))?;

                let features = extractor.extract(&comment).await?;
                let probs = sentiment.predict_proba(&features)?;

                Ok::<CommentScore, AdPulseError>(CommentScore {
                    index,
                    probs,
                    score: probs.score(),
                    toxicity: features.toxicity(),
                })
            });
        }

        let mut scores: Vec<CommentScore> = Vec::with_capacity(comments.len());
        let mut dropped = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let result =
                joined.map_err(|e| AdPulseError::Other(format!("Scoring task panicked: {}", e)))?;

            match result {
                Ok(score) => scores.push(score),
                Err(e) => match self.partial_failure {
                    PartialFailurePolicy::Fail => {
                        return Err(AdPulseError::Other(format!(
                            "Scoring ad '{}' failed: {}",
                            ad_id, e
                        )));
                    }
                    PartialFailurePolicy::Drop => {
                        warn!("Dropping comment for ad '{}': {}", ad_id, e);
                        dropped += 1;
                    }
                },
            }
        }

        if scores.is_empty() && !comments.is_empty() {
            return Err(AdPulseError::Other(format!(
                "All {} comments failed scoring for ad '{}'",
                comments.len(),
                ad_id
            )));
        }

        scores.sort_by_key(|s| s.index);

        let score_values: Vec<f32> = scores.iter().map(|s| s.score).collect();
        let toxicities: Vec<f32> = scores.iter().map(|s| s.toxicity).collect();

        let agg = aggregate(&score_values);
        let avg_toxicity = mean_toxicity(&toxicities);

        let ad_embedding = self.extractor.embed(ad_text).await?;
        let predicted = self
            .receptiveness
            .predict(&ad_embedding, agg.mean_sentiment)? as f32;

        let analytics = derive_analytics(agg.mean_sentiment, avg_toxicity, predicted);

        info!(
            "Scored ad '{}': {} comments ({} dropped), mean sentiment {:.3}, receptiveness {:.3}",
            ad_id,
            scores.len(),
            dropped,
            agg.mean_sentiment,
            agg.receptiveness_index
        );

        Ok(AdReport {
            ad_id: ad_id.to_string(),
            ad_text: ad_text.to_string(),
            mean_sentiment: agg.mean_sentiment,
            receptiveness_index: agg.receptiveness_index,
            analytics,
            comment_scores: scores,
            comments_dropped: dropped,
            generated_at: Utc::now(),
        })
    }
}
