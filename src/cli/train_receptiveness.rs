//! Train the ad receptiveness regressor
//!
//! Requires a fitted sentiment model: the regression target for each ad is
//! derived from the mean sentiment of its comments under that classifier.

use crate::cli::helpers::{build_extractor, resolve_dataset};
use crate::config::PipelineConfig;
use crate::dataset::{group_by_ad, load_ad_comments};
use crate::error::{AdPulseError, Result};
use crate::model::artifact;
use crate::model::receptiveness::ReceptivenessModel;
use ndarray::{Array1, Array2};
use std::path::PathBuf;
use tracing::info;

/// Handle the train-receptiveness command
pub async fn handle(config: &PipelineConfig, dataset: Option<PathBuf>, alpha: f64) -> Result<()> {
    let sentiment = artifact::load_sentiment(&config.artifacts.sentiment_model)?;

    let extractor = build_extractor(config).await?;
    extractor.schema().check_compatible(sentiment.schema())?;

    let dataset_dir = resolve_dataset(dataset, &config.data.dataset_root, "ad_labels");
    let groups = group_by_ad(load_ad_comments(&dataset_dir)?);

    if groups.is_empty() {
        return Err(AdPulseError::Dataset(
            "No ad groups found in training data".to_string(),
        ));
    }

    info!("Training receptiveness regressor on {} ads", groups.len());

    let embedding_dim = extractor.schema().embedding_dim;
    let mut x = Array2::<f64>::zeros((groups.len(), embedding_dim + 1));
    let mut y = Array1::<f64>::zeros(groups.len());

    for (row, group) in groups.iter().enumerate() {
        let mut scores = Vec::with_capacity(group.comments.len());
        for comment in &group.comments {
            let features = extractor.extract(comment).await?;
            scores.push(sentiment.score(&features)?);
        }

        let mean_sentiment = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        };

        let ad_embedding = extractor.embed(&group.ad_text).await?;
        for (col, &v) in ad_embedding.iter().enumerate() {
            x[[row, col]] = v as f64;
        }
        x[[row, embedding_dim]] = mean_sentiment as f64;

        y[row] = ((mean_sentiment + 1.0) / 2.0) as f64;

        info!(
            "Ad '{}': {} comments, mean sentiment {:.3}",
            group.ad_id,
            group.comments.len(),
            mean_sentiment
        );
    }

    let model = ReceptivenessModel::fit(&x, &y, alpha)?;

    artifact::save_receptiveness(&model, &config.artifacts.receptiveness_model)?;
    println!(
        "Receptiveness model saved to {:?} (alpha {})",
        config.artifacts.receptiveness_model,
        model.alpha()
    );

    Ok(())
}
