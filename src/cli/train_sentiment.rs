//! Train the comment sentiment classifier

use crate::cli::helpers::{build_extractor, resolve_dataset};
use crate::config::PipelineConfig;
use crate::dataset::{classification_report, load_labeled_comments, train_test_split};
use crate::error::Result;
use crate::model::artifact;
use crate::model::sentiment::{SentimentModel, SentimentTrainParams};
use std::path::PathBuf;
use tracing::info;

/// Handle the train-sentiment command
pub async fn handle(
    config: &PipelineConfig,
    dataset: Option<PathBuf>,
    test_fraction: f64,
    seed: u64,
) -> Result<()> {
    let dataset_dir = resolve_dataset(dataset, &config.data.dataset_root, "comment_labels");
    let records = load_labeled_comments(&dataset_dir)?;
    info!(
        "Training sentiment classifier on {} labeled comments",
        records.len()
    );

    let extractor = build_extractor(config).await?;

    let mut features = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for (i, (text, label)) in records.iter().enumerate() {
        features.push(extractor.extract(text).await?);
        labels.push(*label);

        if (i + 1) % 50 == 0 {
            info!("Extracted features for {}/{} comments", i + 1, records.len());
        }
    }

    let (train_idx, test_idx) = train_test_split(records.len(), test_fraction, seed);

    let train_features: Vec<_> = train_idx.iter().map(|&i| features[i].clone()).collect();
    let train_labels: Vec<_> = train_idx.iter().map(|&i| labels[i]).collect();

    let model = SentimentModel::fit(&train_features, &train_labels, &SentimentTrainParams::default())?;

    if !test_idx.is_empty() {
        let y_true: Vec<_> = test_idx.iter().map(|&i| labels[i]).collect();
        let y_pred = test_idx
            .iter()
            .map(|&i| model.predict(&features[i]))
            .collect::<Result<Vec<_>>>()?;

        println!("{}", classification_report(&y_true, &y_pred));
    }

    artifact::save_sentiment(&model, &config.artifacts.sentiment_model)?;
    println!(
        "Sentiment model saved to {:?}",
        config.artifacts.sentiment_model
    );

    Ok(())
}
