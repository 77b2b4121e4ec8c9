//! Comment sentiment classifier
//!
//! Multinomial (softmax) logistic regression over standardized feature
//! vectors, producing calibrated probabilities for the fixed class order
//! negative / neutral / positive. The fitted scaler and the feature schema
//! travel with the weights: applying the classifier to unscaled or
//! differently-shaped features is a contract violation and fails fast.

use crate::error::{AdPulseError, Result};
use crate::features::{FeatureSchema, FeatureVector};
use crate::model::scaler::StandardScaler;
use crate::types::{SentimentLabel, SentimentProbs};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentTrainParams {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    /// L2 penalty applied to the weights during fitting
    pub l2: f64,
}

impl Default for SentimentTrainParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-6,
            l2: 1e-3,
        }
    }
}

/// Fitted sentiment classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentModel {
    /// Weights, one row per class (3 x n_features)
    coefficients: Array2<f64>,
    /// Per-class intercepts
    intercepts: Array1<f64>,
    /// Scaler fitted on the training features
    scaler: StandardScaler,
    /// Feature layout the model was trained against
    schema: FeatureSchema,
}

impl SentimentModel {
    /// Fit a classifier on feature vectors and labels
    ///
    /// All feature vectors must share one schema; training fails on a mixed
    /// batch rather than guessing which layout is authoritative.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[SentimentLabel],
        params: &SentimentTrainParams,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(AdPulseError::Dataset(
                "Cannot train on an empty dataset".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(AdPulseError::Dataset(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let schema = features[0].schema.clone();
        for fv in features {
            schema.check_compatible(&fv.schema)?;
        }

        let n_samples = features.len();
        let n_features = schema.len();

        let mut x = Array2::<f64>::zeros((n_samples, n_features));
        for (i, fv) in features.iter().enumerate() {
            for (j, &v) in fv.values.iter().enumerate() {
                x[[i, j]] = v as f64;
            }
        }

        let scaler = StandardScaler::fit(&x)?;
        let x = scaler.transform(&x)?;

        // One-hot encode labels
        let mut y_onehot = Array2::<f64>::zeros((n_samples, SentimentLabel::COUNT));
        for (i, label) in labels.iter().enumerate() {
            y_onehot[[i, label.index()]] = 1.0;
        }

        let mut weights = Array2::<f64>::zeros((SentimentLabel::COUNT, n_features));
        let mut biases = Array1::<f64>::zeros(SentimentLabel::COUNT);

        for iter in 0..params.max_iter {
            let weights_old = weights.clone();

            // Forward pass
            let mut proba = Array2::<f64>::zeros((n_samples, SentimentLabel::COUNT));
            for i in 0..n_samples {
                let linear = weights.dot(&x.row(i).to_owned()) + &biases;
                proba.row_mut(i).assign(&softmax(&linear));
            }

            let errors = &proba - &y_onehot;

            for c in 0..SentimentLabel::COUNT {
                let mut dw = x.t().dot(&errors.column(c)) / n_samples as f64;
                dw = &dw + &(&weights.row(c).to_owned() * params.l2);
                let db = errors.column(c).sum() / n_samples as f64;

                for j in 0..n_features {
                    weights[[c, j]] -= params.learning_rate * dw[j];
                }
                biases[c] -= params.learning_rate * db;
            }

            let diff: f64 = weights
                .iter()
                .zip(weights_old.iter())
                .map(|(&a, &b)| (a - b).abs())
                .sum();

            if diff < params.tolerance {
                debug!("Sentiment classifier converged at iteration {}", iter);
                break;
            }
        }

        Ok(Self {
            coefficients: weights,
            intercepts: biases,
            scaler,
            schema,
        })
    }

    /// Feature schema the model was trained with
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict calibrated class probabilities for one feature vector
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<SentimentProbs> {
        self.schema.check_compatible(&features.schema)?;
        self.schema.check_len(&features.values)?;

        let raw = Array1::from_iter(features.values.iter().map(|&v| v as f64));
        let scaled = self.scaler.transform_row(&raw)?;

        let linear = self.coefficients.dot(&scaled) + &self.intercepts;
        let proba = softmax(&linear);

        Ok(SentimentProbs {
            negative: proba[SentimentLabel::Negative.index()] as f32,
            neutral: proba[SentimentLabel::Neutral.index()] as f32,
            positive: proba[SentimentLabel::Positive.index()] as f32,
        })
    }

    /// Predict the scalar comment score `p_pos - p_neg`
    pub fn score(&self, features: &FeatureVector) -> Result<f32> {
        Ok(self.predict_proba(features)?.score())
    }

    /// Predict the most probable label
    pub fn predict(&self, features: &FeatureVector) -> Result<SentimentLabel> {
        Ok(self.predict_proba(features)?.argmax())
    }
}

/// Numerically stable softmax
fn softmax(z: &Array1<f64>) -> Array1<f64> {
    let max_z = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_z = z.mapv(|x| (x - max_z).exp());
    let sum = exp_z.sum();
    exp_z / sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(dim: usize) -> FeatureSchema {
        FeatureSchema::new("test-model", dim)
    }

    fn fv(schema: &FeatureSchema, values: Vec<f32>) -> FeatureVector {
        FeatureVector {
            values,
            schema: schema.clone(),
        }
    }

    /// Tiny separable dataset: one informative feature, four schema scalars
    fn toy_dataset(s: &FeatureSchema) -> (Vec<FeatureVector>, Vec<SentimentLabel>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();

        for i in 0..10 {
            let shift = i as f32 * 0.05;
            features.push(fv(s, vec![-1.0 - shift, -0.8, 0.0, 0.0, 0.1]));
            labels.push(SentimentLabel::Negative);
            features.push(fv(s, vec![0.0 + shift * 0.1, 0.0, 0.0, 1.0, 0.05]));
            labels.push(SentimentLabel::Neutral);
            features.push(fv(s, vec![1.0 + shift, 0.8, 1.0, 0.0, 0.02]));
            labels.push(SentimentLabel::Positive);
        }

        (features, labels)
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let s = schema(1);
        let (features, labels) = toy_dataset(&s);
        let model = SentimentModel::fit(&features, &labels, &Default::default()).unwrap();

        for fv in &features {
            let p = model.predict_proba(fv).unwrap();
            let sum = p.negative + p.neutral + p.positive;
            assert!((sum - 1.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&p.negative));
            assert!((0.0..=1.0).contains(&p.neutral));
            assert!((0.0..=1.0).contains(&p.positive));
        }
    }

    #[test]
    fn test_score_in_range_and_directional() {
        let s = schema(1);
        let (features, labels) = toy_dataset(&s);
        let model = SentimentModel::fit(&features, &labels, &Default::default()).unwrap();

        let positive = fv(&s, vec![1.2, 0.9, 2.0, 0.0, 0.01]);
        let negative = fv(&s, vec![-1.2, -0.9, 0.0, 0.0, 0.3]);

        let pos_score = model.score(&positive).unwrap();
        let neg_score = model.score(&negative).unwrap();

        assert!((-1.0..=1.0).contains(&pos_score));
        assert!((-1.0..=1.0).contains(&neg_score));
        assert!(pos_score > neg_score);
    }

    #[test]
    fn test_separable_dataset_learned() {
        let s = schema(1);
        let (features, labels) = toy_dataset(&s);
        let model = SentimentModel::fit(&features, &labels, &Default::default()).unwrap();

        let correct = features
            .iter()
            .zip(labels.iter())
            .filter(|(f, l)| model.predict(f).unwrap() == **l)
            .count();

        assert!(correct as f64 / labels.len() as f64 >= 0.8);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let s = schema(1);
        let (features, labels) = toy_dataset(&s);
        let model = SentimentModel::fit(&features, &labels, &Default::default()).unwrap();

        let wrong = fv(&schema(2), vec![0.0; 6]);
        let err = model.predict_proba(&wrong).unwrap_err();
        assert!(matches!(err, AdPulseError::FeatureSchema { .. }));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let result = SentimentModel::fit(&[], &[], &Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_label_count_mismatch_rejected() {
        let s = schema(1);
        let features = vec![fv(&s, vec![0.0; 5])];
        let result = SentimentModel::fit(&features, &[], &Default::default());
        assert!(result.is_err());
    }
}
