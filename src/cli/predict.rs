//! Score a single ad given inline or file-sourced comments

use crate::config::PipelineConfig;
use crate::error::{AdPulseError, Result};
use crate::pipeline::ScoringPipeline;
use std::fs;
use std::path::PathBuf;

/// Handle the predict command
pub async fn handle(
    config: &PipelineConfig,
    ad_id: String,
    ad_text: String,
    mut comments: Vec<String>,
    comments_file: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = comments_file {
        let content = fs::read_to_string(&path)?;
        let mut from_file: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            AdPulseError::Dataset(format!("Malformed comments file {:?}: {}", path, e))
        })?;
        comments.append(&mut from_file);
    }

    if comments.is_empty() {
        return Err(AdPulseError::Validation(
            "No comments given; pass them as arguments or via --comments-file".to_string(),
        ));
    }

    let pipeline = ScoringPipeline::new(config).await?;
    let report = pipeline.score_ad(&ad_id, &ad_text, &comments).await?;

    println!("Ad: {}", report.ad_text);
    println!();

    for score in &report.comment_scores {
        println!(
            "  [{}] {:+.3} (neg {:.2} / neu {:.2} / pos {:.2}, toxicity {:.2})  {}",
            score.index,
            score.score,
            score.probs.negative,
            score.probs.neutral,
            score.probs.positive,
            score.toxicity,
            comments[score.index]
        );
    }

    println!();
    println!("mean sentiment:      {:+.3}", report.mean_sentiment);
    println!("receptiveness index: {:.3}", report.receptiveness_index);
    if report.comments_dropped > 0 {
        println!("comments dropped:    {}", report.comments_dropped);
    }
    println!();
    println!("quality:    {:.3}", report.analytics.quality);
    println!("hostility:  {:.3}", report.analytics.hostility);
    println!("engagement: {:.3}", report.analytics.engagement);
    println!("resonance:  {:.3}", report.analytics.resonance);

    Ok(())
}
