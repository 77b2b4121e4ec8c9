//! Ad receptiveness regressor
//!
//! Ridge regression over `[ad_embedding ⊕ mean_comment_sentiment]`. The
//! embedding dominates the feature count relative to the sample count, so the
//! L2 penalty keeps the weights from overfitting. The mean-sentiment column
//! lets the model learn a correction beyond what ad-text semantics predict.
//!
//! The raw prediction is unbounded — this is least squares, not a bounded
//! estimator — and callers must clamp to [0, 1] before presenting it as
//! resonance.

use crate::error::{AdPulseError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted ridge regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptivenessModel {
    coefficients: Array1<f64>,
    intercept: f64,
    /// Embedding dimensionality the model was trained against
    embedding_dim: usize,
    alpha: f64,
}

impl ReceptivenessModel {
    /// Fit with the closed-form solution `β = (X'X + αI)⁻¹ X'y`
    ///
    /// Rows of `x` are `[ad_embedding ⊕ mean_sentiment]`, targets are
    /// receptiveness indices in [0, 1].
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self> {
        if alpha < 0.0 {
            return Err(AdPulseError::Validation(format!(
                "Ridge alpha must be non-negative, got {}",
                alpha
            )));
        }
        if x.nrows() == 0 {
            return Err(AdPulseError::Dataset(
                "Cannot fit regressor on an empty matrix".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(AdPulseError::Dataset(format!(
                "{} samples but {} targets",
                x.nrows(),
                y.len()
            )));
        }

        let n_features = x.ncols();

        // Center so the intercept absorbs the means
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AdPulseError::Dataset("Mean computation failed".to_string()))?;
        let y_mean = y
            .mean()
            .ok_or_else(|| AdPulseError::Dataset("Mean computation failed".to_string()))?;
        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        // X'X + αI
        let mut xtx = x_centered.t().dot(&x_centered);
        for i in 0..n_features {
            xtx[[i, i]] += alpha;
        }

        let xty = x_centered.t().dot(&y_centered);

        let coefficients = cholesky_solve(&xtx, &xty)?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        debug!(
            "Fitted receptiveness regressor: {} features, alpha {}",
            n_features, alpha
        );

        Ok(Self {
            coefficients,
            intercept,
            embedding_dim: n_features - 1,
            alpha,
        })
    }

    /// Embedding dimensionality expected at inference
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Raw predicted receptiveness for `[ad_embedding ⊕ mean_sentiment]`
    pub fn predict(&self, ad_embedding: &[f32], mean_sentiment: f32) -> Result<f64> {
        if ad_embedding.len() != self.embedding_dim {
            return Err(AdPulseError::FeatureSchema {
                expected: self.embedding_dim,
                actual: ad_embedding.len(),
            });
        }

        let mut row = Array1::<f64>::zeros(self.embedding_dim + 1);
        for (i, &v) in ad_embedding.iter().enumerate() {
            row[i] = v as f64;
        }
        row[self.embedding_dim] = mean_sentiment as f64;

        Ok(row.dot(&self.coefficients) + self.intercept)
    }

    /// Regularization strength used at fit time
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Solve `A x = b` for symmetric positive-definite `A` via Cholesky
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(AdPulseError::Other(
                        "Matrix not positive definite".to_string(),
                    ));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
