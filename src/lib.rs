//! Adpulse - Ad Sentiment & Receptiveness Scoring Pipeline
//!
//! Turns social-media comments and ad text into sentiment and receptiveness
//! scores using a two-stage model:
//! - a per-comment sentiment classifier over semantic-embedding features
//!   augmented with handcrafted scalars (polarity, emoji count, question
//!   flag, toxicity),
//! - an ad-level ridge regressor over `[ad_embedding ⊕ mean_sentiment]`.
//!
//! # Architecture
//!
//! - **embeddings / services**: external embedding and toxicity backends
//!   behind traits, local (fastembed) or remote (HTTP)
//! - **features**: versioned feature schema and the extractor
//! - **model**: classifier, regressor, scaler, artifact persistence
//! - **aggregate**: pure ad-level aggregation and analytics arithmetic
//! - **pipeline**: the application context wiring it all together
//!
//! # Example
//!
//! ```ignore
//! use adpulse::{config::PipelineConfig, pipeline::ScoringPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::load(Some("adpulse.toml".as_ref()))?;
//!     let pipeline = ScoringPipeline::new(&config).await?;
//!
//!     let report = pipeline
//!         .score_ad("ad-1", "Eco-friendly sneakers!", &comments)
//!         .await?;
//!     println!("receptiveness: {:.3}", report.receptiveness_index);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{AdPulseError, Result};
pub use features::{FeatureExtractor, FeatureSchema, FeatureVector};
pub use model::{ReceptivenessModel, SentimentModel};
pub use pipeline::ScoringPipeline;
pub use types::{AdAggregate, AdReport, Analytics, CommentScore, SentimentLabel, SentimentProbs};
