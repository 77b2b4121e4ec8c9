//! Dataset loading and report output
//!
//! Training and scoring inputs are JSON arrays of records; every `.json`
//! file under a dataset root is read and concatenated. The aggregate run
//! writes a CSV report with one row per ad.

use crate::error::{AdPulseError, Result};
use crate::types::{AdReport, SentimentLabel};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Sentiment training record: `{text, label}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledComment {
    pub text: String,
    pub label: String,
}

/// Ad/comment scoring record: `{ad_id, ad_text, comment}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCommentRecord {
    pub ad_id: String,
    pub ad_text: String,
    pub comment: String,
}

/// One ad with all of its comments, in input order
#[derive(Debug, Clone)]
pub struct AdGroup {
    pub ad_id: String,
    pub ad_text: String,
    pub comments: Vec<String>,
}

fn read_json_files<T: serde::de::DeserializeOwned>(root: &Path) -> Result<Vec<T>> {
    if !root.is_dir() {
        return Err(AdPulseError::Dataset(format!(
            "Dataset root {:?} is not a directory",
            root
        )));
    }

    let mut paths: Vec<_> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(AdPulseError::Dataset(format!(
            "No .json files under {:?}",
            root
        )));
    }

    let mut records = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)?;
        let mut batch: Vec<T> = serde_json::from_str(&content).map_err(|e| {
            AdPulseError::Dataset(format!("Malformed dataset file {:?}: {}", path, e))
        })?;
        info!("Loaded {} records from {:?}", batch.len(), path);
        records.append(&mut batch);
    }

    Ok(records)
}

/// Load sentiment training data, parsing labels
pub fn load_labeled_comments(root: &Path) -> Result<Vec<(String, SentimentLabel)>> {
    let records: Vec<LabeledComment> = read_json_files(root)?;

    records
        .into_iter()
        .map(|r| {
            let label = SentimentLabel::parse(&r.label)?;
            Ok((r.text, label))
        })
        .collect()
}

/// Load ad/comment records for scoring or receptiveness training
pub fn load_ad_comments(root: &Path) -> Result<Vec<AdCommentRecord>> {
    read_json_files(root)
}

/// Group flat ad/comment records by ad, preserving first-seen order
pub fn group_by_ad(records: Vec<AdCommentRecord>) -> Vec<AdGroup> {
    let mut groups: Vec<AdGroup> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|g| g.ad_id == record.ad_id) {
            Some(group) => group.comments.push(record.comment),
            None => groups.push(AdGroup {
                ad_id: record.ad_id,
                ad_text: record.ad_text,
                comments: vec![record.comment],
            }),
        }
    }

    groups
}

/// Seeded shuffle + split into (train, test) index sets
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).round() as usize;
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Simple accuracy plus per-class precision/recall summary
pub fn classification_report(
    y_true: &[SentimentLabel],
    y_pred: &[SentimentLabel],
) -> String {
    let classes = [
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];
    let names = ["negative", "neutral", "positive"];

    let total = y_true.len();
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    let mut report = format!(
        "accuracy: {:.3} ({}/{})\n",
        if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        },
        correct,
        total
    );

    for (class, name) in classes.iter().zip(names.iter()) {
        let tp = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| **t == *class && **p == *class)
            .count();
        let pred_count = y_pred.iter().filter(|p| **p == *class).count();
        let true_count = y_true.iter().filter(|t| **t == *class).count();

        let precision = if pred_count > 0 {
            tp as f64 / pred_count as f64
        } else {
            0.0
        };
        let recall = if true_count > 0 {
            tp as f64 / true_count as f64
        } else {
            0.0
        };

        report.push_str(&format!(
            "{:>9}: precision {:.3}, recall {:.3}, support {}\n",
            name, precision, recall, true_count
        ));
    }

    report
}

/// Write the aggregate report CSV (`ad_id, ad_text, mean_sentiment, receptiveness_index`)
pub fn write_report_csv(reports: &[AdReport], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["ad_id", "ad_text", "mean_sentiment", "receptiveness_index"])?;

    for report in reports {
        writer.write_record([
            report.ad_id.clone(),
            report.ad_text.clone(),
            format!("{:.6}", report.mean_sentiment),
            format!("{:.6}", report.receptiveness_index),
        ])?;
    }

    writer.flush()?;
    info!("Wrote {} report rows to {:?}", reports.len(), path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Analytics;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_load_labeled_comments() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("batch1.json");
        fs::write(
            &file,
            r#"[{"text": "love it", "label": "positive"}, {"text": "meh", "label": "neutral"}]"#,
        )
        .unwrap();

        let records = load_labeled_comments(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].1, SentimentLabel::Positive);
    }

    #[test]
    fn test_bad_label_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"[{"text": "x", "label": "lukewarm"}]"#,
        )
        .unwrap();

        assert!(load_labeled_comments(dir.path()).is_err());
    }

    #[test]
    fn test_empty_dir_rejected() {
        let dir = tempdir().unwrap();
        assert!(load_ad_comments(dir.path()).is_err());
    }

    #[test]
    fn test_group_by_ad() {
        let records = vec![
            AdCommentRecord {
                ad_id: "a1".into(),
                ad_text: "first".into(),
                comment: "c1".into(),
            },
            AdCommentRecord {
                ad_id: "a2".into(),
                ad_text: "second".into(),
                comment: "c2".into(),
            },
            AdCommentRecord {
                ad_id: "a1".into(),
                ad_text: "first".into(),
                comment: "c3".into(),
            },
        ];

        let groups = group_by_ad(records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].comments, vec!["c1", "c3"]);
        assert_eq!(groups[1].comments, vec!["c2"]);
    }

    #[test]
    fn test_train_test_split_deterministic() {
        let (train_a, test_a) = train_test_split(100, 0.2, 42);
        let (train_b, test_b) = train_test_split(100, 0.2, 42);

        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 20);
        assert_eq!(train_a.len(), 80);
    }

    #[test]
    fn test_classification_report_accuracy() {
        let y_true = vec![SentimentLabel::Positive, SentimentLabel::Negative];
        let y_pred = vec![SentimentLabel::Positive, SentimentLabel::Positive];

        let report = classification_report(&y_true, &y_pred);
        assert!(report.contains("accuracy: 0.500"));
    }

    #[test]
    fn test_write_report_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let reports = vec![AdReport {
            ad_id: "ad-1".into(),
            ad_text: "eco sneakers".into(),
            mean_sentiment: 0.34,
            receptiveness_index: 0.67,
            analytics: Analytics {
                quality: 0.34,
                hostility: 0.1,
                engagement: 0.6,
                resonance: 0.7,
            },
            comment_scores: vec![],
            comments_dropped: 0,
            generated_at: Utc::now(),
        }];

        write_report_csv(&reports, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ad_id,ad_text,mean_sentiment,receptiveness_index"));
        assert!(content.contains("ad-1"));
    }
}
