//! Embedding generation services
//!
//! Provides both local (fastembed) and remote (HTTP) embedding backends
//! behind a common trait so the feature extractor and tests can swap them.

pub mod local;
pub mod remote;

pub use local::LocalEmbedder;
pub use remote::RemoteEmbedder;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Text embedding service
///
/// Implementations must be deterministic for identical input and model
/// version, and safe to call concurrently.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batched)
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimensionality (e.g. 384 for all-MiniLM-L6-v2)
    fn dimensions(&self) -> usize;

    /// Model name
    fn model_name(&self) -> &str;
}

/// Construct the embedder selected by the configuration
pub async fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn TextEmbedder>> {
    match config.provider {
        EmbeddingProvider::Local => Ok(Arc::new(LocalEmbedder::new(config.clone()).await?)),
        EmbeddingProvider::Remote => Ok(Arc::new(RemoteEmbedder::new(config.clone())?)),
    }
}
