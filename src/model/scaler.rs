//! Per-feature standardization
//!
//! Centers and scales each feature column to zero mean and unit variance.
//! Parameters are fit on training data only and stored in the model
//! artifact, so inference always reuses the training-time statistics.

use crate::{HoopsError, Result};
use serde::{Deserialize, Serialize};

/// Column-wise standardization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and scales on a feature matrix
    ///
    /// Scale is the population standard deviation. Zero-variance columns
    /// get scale 1.0 so they transform to zero instead of dividing by zero.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(HoopsError::Training(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let n_features = rows[0].len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; n_features];
        for row in rows {
            for (j, value) in row.iter().enumerate() {
                means[j] += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut scales = vec![0.0; n_features];
        for row in rows {
            for (j, value) in row.iter().enumerate() {
                scales[j] += (value - means[j]).powi(2);
            }
        }
        for scale in &mut scales {
            *scale = (*scale / n).sqrt();
            if *scale == 0.0 {
                *scale = 1.0;
            }
        }

        Ok(StandardScaler { means, scales })
    }

    /// Standardize a matrix with the fitted parameters
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.means.len() {
                    return Err(HoopsError::Inference(format!(
                        "Expected {} features, got {}",
                        self.means.len(),
                        row.len()
                    )));
                }
                Ok(row
                    .iter()
                    .enumerate()
                    .map(|(j, value)| (value - self.means[j]) / self.scales[j])
                    .collect())
            })
            .collect()
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_population_statistics() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 10.0], vec![3.0, 10.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();

        let transformed = scaler.transform(&rows).unwrap();
        // Mean 2.0, population std sqrt(2/3)
        let std = (2.0f64 / 3.0).sqrt();
        assert!((transformed[0][0] - (1.0 - 2.0) / std).abs() < 1e-12);
        assert!((transformed[2][0] - (3.0 - 2.0) / std).abs() < 1e-12);
    }

    #[test]
    fn test_transformed_columns_are_standardized() {
        let rows = vec![vec![5.0], vec![7.0], vec![9.0], vec![11.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let transformed = scaler.transform(&rows).unwrap();

        let mean: f64 = transformed.iter().map(|r| r[0]).sum::<f64>() / 4.0;
        let var: f64 = transformed.iter().map(|r| (r[0] - mean).powi(2)).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_column_maps_to_zero() {
        let rows = vec![vec![4.0], vec![4.0], vec![4.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let transformed = scaler.transform(&rows).unwrap();

        assert_eq!(transformed[0][0], 0.0);
        assert_eq!(transformed[2][0], 0.0);
    }

    #[test]
    fn test_transform_uses_training_statistics() {
        let train = vec![vec![0.0], vec![2.0]];
        let scaler = StandardScaler::fit(&train).unwrap();

        // Mean 1.0, std 1.0: new data standardizes against the fit
        let other = scaler.transform(&[vec![3.0]]).unwrap();
        assert!((other[0][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(StandardScaler::fit(&[]).is_err());
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let scaler = StandardScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(scaler.transform(&[vec![1.0]]).is_err());
    }
}
