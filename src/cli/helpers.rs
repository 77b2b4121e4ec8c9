//! Shared construction helpers for CLI handlers

use crate::config::PipelineConfig;
use crate::embeddings::build_embedder;
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::services::{HttpToxicityScorer, ToxicityScorer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build a feature extractor from configuration (no models required)
pub async fn build_extractor(config: &PipelineConfig) -> Result<FeatureExtractor> {
    let embedder = build_embedder(&config.embedding).await?;
    let toxicity: Arc<dyn ToxicityScorer> = Arc::new(HttpToxicityScorer::new(&config.toxicity)?);
    Ok(FeatureExtractor::new(embedder, toxicity))
}

/// Resolve a dataset directory: explicit flag, else `<root>/<default_subdir>`
pub fn resolve_dataset(
    explicit: Option<PathBuf>,
    root: &Path,
    default_subdir: &str,
) -> PathBuf {
    explicit.unwrap_or_else(|| root.join(default_subdir))
}
