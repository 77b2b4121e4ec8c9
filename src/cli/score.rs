//! Score a dataset of ads and write the aggregate report

use crate::cli::helpers::resolve_dataset;
use crate::config::PipelineConfig;
use crate::dataset::{group_by_ad, load_ad_comments, write_report_csv};
use crate::error::Result;
use crate::pipeline::ScoringPipeline;
use std::path::PathBuf;
use tracing::info;

/// Handle the score command
pub async fn handle(
    config: &PipelineConfig,
    dataset: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let pipeline = ScoringPipeline::new(config).await?;

    let dataset_dir = resolve_dataset(dataset, &config.data.dataset_root, "ads");
    let groups = group_by_ad(load_ad_comments(&dataset_dir)?);
    info!("Scoring {} ads from {:?}", groups.len(), dataset_dir);

    let mut reports = Vec::with_capacity(groups.len());
    for group in &groups {
        let report = pipeline
            .score_ad(&group.ad_id, &group.ad_text, &group.comments)
            .await?;

        println!(
            "{}: mean sentiment {:+.3}, receptiveness {:.3} ({} comments, {} dropped)",
            report.ad_id,
            report.mean_sentiment,
            report.receptiveness_index,
            report.comment_scores.len(),
            report.comments_dropped
        );

        reports.push(report);
    }

    let output_path = output.unwrap_or_else(|| config.data.report_path.clone());
    write_report_csv(&reports, &output_path)?;
    println!("Report written to {:?}", output_path);

    Ok(())
}
