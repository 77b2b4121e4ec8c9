//! Remote embedding backend
//!
//! Calls an HTTP embedding service (`POST {base_url}/embed`) that returns a
//! fixed-length vector per input text. Failures surface as tagged
//! [`AdPulseError::Embedding`] values; a degraded service is never reported
//! as a zero vector.

use crate::config::EmbeddingConfig;
use crate::embeddings::TextEmbedder;
use crate::error::{AdPulseError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Maximum texts per request
const MAX_BATCH_SIZE: usize = 128;

/// Maximum retry attempts for rate limiting and timeouts
const MAX_RETRIES: usize = 3;

/// Backoff base duration in milliseconds
const BACKOFF_BASE_MS: u64 = 1000;

/// Request timeout duration
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP embedding service client
pub struct RemoteEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimensions: usize,
    /// Configured batch size, capped at the service limit
    batch_size: usize,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl RemoteEmbedder {
    /// Create a new remote embedder from configuration
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        config.validate()?;
        let dimensions = config.dimensions()?;

        let base_url = config.base_url.clone().ok_or_else(|| {
            AdPulseError::Validation("remote embedder requires a base_url".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AdPulseError::Embedding(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            model: config.model,
            dimensions,
            batch_size: config.batch_size.min(MAX_BATCH_SIZE),
        })
    }

    /// Call the service with retry on rate limiting and timeouts
    async fn call_with_retry(&self, texts: &[String]) -> Result<EmbedResponse> {
        let mut retries = 0;

        loop {
            match self.call_once(texts).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    let retryable = match &e {
                        AdPulseError::Embedding(msg) => {
                            msg.contains("rate limit") || msg.contains("timeout")
                        }
                        _ => false,
                    };

                    if !retryable || retries >= MAX_RETRIES {
                        return Err(e);
                    }

                    let backoff_ms = BACKOFF_BASE_MS * 2_u64.pow(retries as u32);
                    warn!(
                        "Embedding call failed, retrying after {}ms (attempt {}/{})",
                        backoff_ms,
                        retries + 1,
                        MAX_RETRIES
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;
                    retries += 1;
                }
            }
        }
    }

    async fn call_once(&self, texts: &[String]) -> Result<EmbedResponse> {
        debug!(
            "Calling embedding service: {} texts, model {}",
            texts.len(),
            self.model
        );

        let request = EmbedRequest {
            input: texts.to_vec(),
            model: self.model.clone(),
        };

        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdPulseError::Embedding("request timeout".to_string())
                } else {
                    AdPulseError::Embedding(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::OK => response
                .json::<EmbedResponse>()
                .await
                .map_err(|e| AdPulseError::Embedding(format!("Malformed response: {}", e))),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(AdPulseError::Embedding("rate limit exceeded".to_string()))
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                Err(AdPulseError::Embedding(format!(
                    "Service error (status {}): {}",
                    status, body
                )))
            }
        }
    }

    fn validate_embedding(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(AdPulseError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        if embedding.iter().any(|&x| !x.is_finite()) {
            return Err(AdPulseError::Embedding(
                "Embedding contains NaN or Inf values".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl TextEmbedder for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self.call_with_retry(&[text.to_string()]).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AdPulseError::Embedding("Empty response from service".to_string()))?
            .embedding;

        self.validate_embedding(&embedding)?;

        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let strings: Vec<String> = chunk.iter().map(|s| s.to_string()).collect();
            let response = self.call_with_retry(&strings).await?;

            // The service may respond out of order
            let mut data = response.data;
            data.sort_by_key(|d| d.index);

            for item in data {
                self.validate_embedding(&item.embedding)?;
                all_embeddings.push(item.embedding);
            }
        }

        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
