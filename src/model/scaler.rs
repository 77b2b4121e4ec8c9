//! Feature standardization
//!
//! Per-column zero-mean unit-variance scaling. The sentiment classifier is
//! trained on scaled features, so the fitted means and standard deviations
//! are persisted with it and applied to every inference input.

use crate::error::{AdPulseError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard (z-score) feature scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl StandardScaler {
    /// Fit the scaler on a feature matrix (rows = samples)
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(AdPulseError::Dataset(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AdPulseError::Dataset("Mean computation failed".to_string()))?;

        let std = x.std_axis(Axis(0), 0.0);
        // Constant columns pass through unscaled
        let std = std.mapv(|s| if s < 1e-10 { 1.0 } else { s });

        Ok(Self { mean, std })
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Scale a feature matrix
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(AdPulseError::FeatureSchema {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        Ok((x - &self.mean) / &self.std)
    }

    /// Scale a single feature row
    pub fn transform_row(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.n_features() {
            return Err(AdPulseError::FeatureSchema {
                expected: self.n_features(),
                actual: x.len(),
            });
        }

        Ok((x - &self.mean) / &self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        // Each column should have mean ~0
        let means = scaled.mean_axis(Axis(0)).unwrap();
        for &m in means.iter() {
            assert!(m.abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_column_passthrough() {
        let x = array![[1.0, 5.0], [1.0, 6.0], [1.0, 7.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        // Constant column centered but not exploded
        for row in scaled.rows() {
            assert!(row[0].abs() < 1e-10);
            assert!(row[0].is_finite());
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(&x).unwrap();

        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(scaler.transform(&wrong).is_err());
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(&x).is_err());
    }
}
