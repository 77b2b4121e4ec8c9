//! Toxicity classification service client
//!
//! The external classifier returns `{label, score}` per text; only the score
//! (probability in [0, 1] that the text is toxic) feeds the feature vector.
//! A failed call is a tagged [`AdPulseError::Toxicity`], never a silent 0.

use crate::config::ToxicityConfig;
use crate::error::{AdPulseError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Maximum retry attempts for rate limiting and timeouts
const MAX_RETRIES: usize = 3;

/// Backoff base duration in milliseconds
const BACKOFF_BASE_MS: u64 = 500;

/// Toxicity scoring service
#[async_trait]
pub trait ToxicityScorer: Send + Sync {
    /// Probability in [0, 1] that the text is toxic or abusive
    async fn score(&self, text: &str) -> Result<f32>;
}

/// HTTP client for the toxicity classifier
pub struct HttpToxicityScorer {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[allow(dead_code)]
    label: String,
    score: f32,
}

impl HttpToxicityScorer {
    /// Create a new client from configuration
    pub fn new(config: &ToxicityConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(AdPulseError::Validation(
                "toxicity endpoint cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdPulseError::Toxicity(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn classify_once(&self, text: &str) -> Result<ClassifyResponse> {
        debug!("Calling toxicity classifier ({} chars)", text.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdPulseError::Toxicity("request timeout".to_string())
                } else {
                    AdPulseError::Toxicity(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::OK => response
                .json::<ClassifyResponse>()
                .await
                .map_err(|e| AdPulseError::Toxicity(format!("Malformed response: {}", e))),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(AdPulseError::Toxicity("rate limit exceeded".to_string()))
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                Err(AdPulseError::Toxicity(format!(
                    "Service error (status {}): {}",
                    status, body
                )))
            }
        }
    }
}

#[async_trait]
impl ToxicityScorer for HttpToxicityScorer {
    async fn score(&self, text: &str) -> Result<f32> {
        let mut retries = 0;

        let response = loop {
            match self.classify_once(text).await {
                Ok(response) => break response,
                Err(e) => {
                    let retryable = matches!(
                        &e,
                        AdPulseError::Toxicity(msg)
                            if msg.contains("rate limit") || msg.contains("timeout")
                    );

                    if !retryable || retries >= MAX_RETRIES {
                        return Err(e);
                    }

                    let backoff_ms = BACKOFF_BASE_MS * 2_u64.pow(retries as u32);
                    warn!(
                        "Toxicity call failed, retrying after {}ms (attempt {}/{})",
                        backoff_ms,
                        retries + 1,
                        MAX_RETRIES
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                    retries += 1;
                }
            }
        };

        if !(0.0..=1.0).contains(&response.score) || !response.score.is_finite() {
            return Err(AdPulseError::Toxicity(format!(
                "Score out of range: {}",
                response.score
            )));
        }

        Ok(response.score)
    }
}
