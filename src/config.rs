//! Pipeline configuration
//!
//! All endpoints, artifact paths, and tuning knobs live here instead of being
//! scattered through the training and inference code. A `PipelineConfig` is
//! loaded once at startup (TOML file plus `ADPULSE_`-prefixed environment
//! overrides) and handed to [`crate::pipeline::ScoringPipeline::new`].

use crate::error::{AdPulseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Locally-run ONNX model via fastembed
    Local,
    /// Remote HTTP embedding service
    Remote,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend selection
    pub provider: EmbeddingProvider,
    /// Model name (e.g. "all-MiniLM-L6-v2")
    pub model: String,
    /// Cache directory for downloaded local models
    pub cache_dir: PathBuf,
    /// Batch size for bulk embedding
    pub batch_size: usize,
    /// Base URL for the remote provider
    pub base_url: Option<String>,
    /// Show model download progress on first local load
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Local,
            model: "all-MiniLM-L6-v2".to_string(),
            cache_dir: PathBuf::from(".fastembed_cache"),
            batch_size: 32,
            base_url: None,
            show_download_progress: false,
        }
    }
}

impl EmbeddingConfig {
    /// Supported model names with their output dimensionality
    const SUPPORTED_MODELS: &'static [(&'static str, usize)] = &[
        ("all-MiniLM-L6-v2", 384),
        ("all-MiniLM-L12-v2", 384),
        ("bge-small-en-v1.5", 384),
        ("bge-base-en-v1.5", 768),
        ("nomic-embed-text-v1.5", 768),
    ];

    /// Embedding dimensionality for the configured model
    ///
    /// The dimension is part of the feature-schema contract: models trained
    /// against one embedding model cannot score vectors from another.
    pub fn dimensions(&self) -> Result<usize> {
        Self::SUPPORTED_MODELS
            .iter()
            .find(|(name, _)| *name == self.model)
            .map(|(_, dim)| *dim)
            .ok_or_else(|| {
                AdPulseError::Config(config::ConfigError::Message(format!(
                    "Unsupported embedding model: '{}'",
                    self.model
                )))
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.dimensions()?;

        if self.batch_size == 0 {
            return Err(AdPulseError::Validation(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }

        if self.provider == EmbeddingProvider::Remote && self.base_url.is_none() {
            return Err(AdPulseError::Validation(
                "embedding.base_url is required for the remote provider".to_string(),
            ));
        }

        Ok(())
    }
}

/// Toxicity service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicityConfig {
    /// Classifier endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ToxicityConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8090/classify".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Persisted model artifact paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Comment sentiment classifier (includes its scaler and feature schema)
    pub sentiment_model: PathBuf,
    /// Ad receptiveness regressor
    pub receptiveness_model: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            sentiment_model: PathBuf::from("saved_models/comment_sentiment.bin"),
            receptiveness_model: PathBuf::from("saved_models/ad_receptiveness.bin"),
        }
    }
}

/// Dataset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root directory of JSON dataset files
    pub dataset_root: PathBuf,
    /// Output path for the aggregate CSV report
    pub report_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("datasets"),
            report_path: PathBuf::from("aggregated_ad_performance.csv"),
        }
    }
}

/// What to do when scoring one comment of an ad fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialFailurePolicy {
    /// Abort the whole ad-scoring request on the first failure
    Fail,
    /// Score the subset of comments that succeeded and record the drop count
    Drop,
}

/// Scoring-run behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Maximum number of comments scored concurrently per ad
    pub max_concurrency: usize,
    /// Partial-failure policy for per-comment errors
    pub partial_failure: PartialFailurePolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            partial_failure: PartialFailurePolicy::Drop,
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub toxicity: ToxicityConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl PipelineConfig {
    /// Load configuration from an optional TOML file plus environment overrides
    ///
    /// Environment variables use the `ADPULSE_` prefix with `__` as the
    /// section separator, e.g. `ADPULSE_TOXICITY__ENDPOINT`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("ADPULSE").separator("__"))
            .build()?;

        let cfg: PipelineConfig = settings.try_deserialize()?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.embedding.validate()?;

        if self.scoring.max_concurrency == 0 {
            return Err(AdPulseError::Validation(
                "scoring.max_concurrency must be at least 1".to_string(),
            ));
        }

        if self.toxicity.endpoint.is_empty() {
            return Err(AdPulseError::Validation(
                "toxicity.endpoint cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_dimensions_for_known_models() {
        let mut cfg = EmbeddingConfig::default();
        assert_eq!(cfg.dimensions().unwrap(), 384);

        cfg.model = "bge-base-en-v1.5".to_string();
        assert_eq!(cfg.dimensions().unwrap(), 768);
    }

    #[test]
    fn test_unsupported_model_rejected() {
        let cfg = EmbeddingConfig {
            model: "word2vec".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_remote_requires_base_url() {
        let cfg = EmbeddingConfig {
            provider: EmbeddingProvider::Remote,
            base_url: None,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EmbeddingConfig {
            provider: EmbeddingProvider::Remote,
            base_url: Some("http://localhost:9000".to_string()),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut cfg = PipelineConfig::default();
        cfg.scoring.max_concurrency = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_section_merges_over_defaults() {
        // A single overridden key materializes its section as a one-entry
        // table; the rest of the section must still fill from defaults.
        let settings = config::Config::builder()
            .set_override("toxicity.endpoint", "http://example.com/classify")
            .unwrap()
            .build()
            .unwrap();

        let cfg: PipelineConfig = settings.try_deserialize().unwrap();
        assert_eq!(cfg.toxicity.endpoint, "http://example.com/classify");
        assert_eq!(cfg.toxicity.timeout_secs, ToxicityConfig::default().timeout_secs);
        assert_eq!(cfg.embedding.model, EmbeddingConfig::default().model);
    }

    #[test]
    fn test_partial_embedding_section_merges_over_defaults() {
        let settings = config::Config::builder()
            .set_override("embedding.model", "bge-base-en-v1.5")
            .unwrap()
            .set_override("scoring.max_concurrency", 2i64)
            .unwrap()
            .build()
            .unwrap();

        let cfg: PipelineConfig = settings.try_deserialize().unwrap();
        assert_eq!(cfg.embedding.model, "bge-base-en-v1.5");
        assert_eq!(cfg.embedding.batch_size, EmbeddingConfig::default().batch_size);
        assert_eq!(cfg.scoring.max_concurrency, 2);
        assert_eq!(
            cfg.scoring.partial_failure,
            ScoringConfig::default().partial_failure
        );
        assert!(cfg.validate().is_ok());
    }
}
