//! Local embedding backend using fastembed
//!
//! Runs a sentence-embedding model locally via ONNX Runtime. The model is
//! downloaded to the cache directory on first use and loaded once; after
//! that every inference call shares the same read-only weights.

use crate::config::EmbeddingConfig;
use crate::embeddings::TextEmbedder;
use crate::error::{AdPulseError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::{debug, info};

/// Local embedding service backed by fastembed
pub struct LocalEmbedder {
    /// fastembed model; its embed call needs `&mut self`, hence the mutex
    model: Arc<Mutex<TextEmbedding>>,
    config: EmbeddingConfig,
    dimensions: usize,
}

impl LocalEmbedder {
    /// Load the configured model (downloading it if not cached)
    pub async fn new(config: EmbeddingConfig) -> Result<Self> {
        config.validate()?;
        let dimensions = config.dimensions()?;

        info!(
            "Loading local embedding model: {} ({} dims, cache {:?})",
            config.model, dimensions, config.cache_dir
        );

        let embedding_model = Self::model_name_to_enum(&config.model)?;
        let mut init_options = InitOptions::default();
        init_options.model_name = embedding_model;
        init_options.show_download_progress = config.show_download_progress;
        init_options.cache_dir = config.cache_dir.clone();

        // Model load can take tens of seconds on first download
        let model = task::spawn_blocking(move || TextEmbedding::try_new(init_options))
            .await
            .map_err(|e| AdPulseError::Other(format!("Task join error: {}", e)))?
            .map_err(|e| AdPulseError::Embedding(format!("Failed to load model: {}", e)))?;

        info!("Local embedding model ready");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            config,
            dimensions,
        })
    }

    fn model_name_to_enum(model_name: &str) -> Result<EmbeddingModel> {
        match model_name {
            "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
            _ => Err(AdPulseError::Config(config::ConfigError::Message(format!(
                "Unsupported embedding model: '{}'",
                model_name
            )))),
        }
    }

    /// Embed one chunk of texts in a blocking task (fastembed is synchronous)
    async fn embed_chunk(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding chunk of {} texts", texts.len());

        let model = Arc::clone(&self.model);
        let dimensions = self.dimensions;

        let embeddings = task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|e| format!("Mutex lock failed: {}", e))?;
            guard
                .embed(texts, None)
                .map_err(|e| format!("Embedding generation failed: {}", e))
        })
        .await
        .map_err(|e| AdPulseError::Other(format!("Task join error: {}", e)))?
        .map_err(AdPulseError::Embedding)?;

        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimensions {
                return Err(AdPulseError::Embedding(format!(
                    "Embedding {} has wrong dimensions: expected {}, got {}",
                    i,
                    dimensions,
                    embedding.len()
                )));
            }
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl TextEmbedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_chunk(vec![text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| AdPulseError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let owned: Vec<String> = texts.iter().map(|s| s.to_string()).collect();

        let mut all = Vec::with_capacity(owned.len());
        for chunk in owned.chunks(self.config.batch_size) {
            all.extend(self.embed_chunk(chunk.to_vec()).await?);
        }

        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_mapping() {
        assert!(LocalEmbedder::model_name_to_enum("all-MiniLM-L6-v2").is_ok());
        assert!(LocalEmbedder::model_name_to_enum("bge-base-en-v1.5").is_ok());
        assert!(LocalEmbedder::model_name_to_enum("invalid-model").is_err());
    }

    // Integration tests that download the real model.
    // Run with: cargo test --lib embeddings::local -- --ignored --test-threads=1
    #[tokio::test]
    #[ignore]
    async fn test_embed_single_text() {
        let config = EmbeddingConfig::default();
        let service = LocalEmbedder::new(config).await.unwrap();

        let embedding = service.embed("These sneakers look amazing!").await.unwrap();
        assert_eq!(embedding.len(), 384);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[tokio::test]
    #[ignore]
    async fn test_embed_batch_preserves_order_and_length() {
        let config = EmbeddingConfig {
            batch_size: 2,
            ..Default::default()
        };
        let service = LocalEmbedder::new(config).await.unwrap();

        let texts = vec!["one", "two", "three"];
        let embeddings = service.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        for e in &embeddings {
            assert_eq!(e.len(), 384);
        }
    }
}
