//! Batch Standardization
//!
//! Per-column z-scores over one batch. Statistics are population based
//! and come from the batch alone; there is no persisted scaler state, so
//! every cycle is scored against its own distribution.

use ndarray::{Array1, Array2, Axis};

pub struct BatchScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl BatchScaler {
    /// Fit column means and population standard deviations.
    pub fn fit(matrix: &Array2<f64>) -> Self {
        let columns = matrix.ncols();
        let rows = matrix.nrows();

        let means = matrix
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(columns));

        let mut stds = Array1::zeros(columns);
        if rows > 0 {
            for (i, column) in matrix.columns().into_iter().enumerate() {
                let mean = means[i];
                let variance =
                    column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / rows as f64;
                stds[i] = variance.sqrt();
            }
        }

        Self { means, stds }
    }

    /// Z-score every column. Zero-variance columns become all zeros
    /// instead of dividing by zero.
    pub fn transform(&self, matrix: &Array2<f64>) -> Array2<f64> {
        let mut standardized = matrix.clone();
        for (i, mut column) in standardized.columns_mut().into_iter().enumerate() {
            let std = self.stds[i];
            if std > 0.0 {
                let mean = self.means[i];
                column.mapv_inplace(|v| (v - mean) / std);
            } else {
                column.fill(0.0);
            }
        }
        standardized
    }

    pub fn fit_transform(matrix: &Array2<f64>) -> Array2<f64> {
        Self::fit(matrix).transform(matrix)
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn stds(&self) -> &Array1<f64> {
        &self.stds
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_computes_population_stats() {
        let matrix = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let scaler = BatchScaler::fit(&matrix);

        assert_eq!(scaler.means()[0], 3.0);
        assert_eq!(scaler.means()[1], 10.0);
        assert!((scaler.stds()[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(scaler.stds()[1], 0.0);
    }

    #[test]
    fn test_zero_variance_column_becomes_zeros() {
        let matrix = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let standardized = BatchScaler::fit_transform(&matrix);

        for row in 0..3 {
            assert_eq!(standardized[[row, 1]], 0.0);
        }
    }

    #[test]
    fn test_standardized_column_has_zero_mean_unit_std() {
        let matrix = array![[1.0], [3.0], [5.0], [7.0]];
        let standardized = BatchScaler::fit_transform(&matrix);

        let values: Vec<f64> = standardized.column(0).to_vec();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        assert!(mean.abs() < 1e-12);
        assert!((variance.sqrt() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_transform_matches_twostep() {
        let matrix = array![[2.0, -1.0], [4.0, 0.5], [9.0, 3.0]];
        let scaler = BatchScaler::fit(&matrix);
        assert_eq!(scaler.transform(&matrix), BatchScaler::fit_transform(&matrix));
    }

    #[test]
    fn test_empty_matrix_does_not_panic() {
        let matrix = Array2::<f64>::zeros((0, 3));
        let standardized = BatchScaler::fit_transform(&matrix);
        assert_eq!(standardized.nrows(), 0);
        assert_eq!(standardized.ncols(), 3);
    }
}
