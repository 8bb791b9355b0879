use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{RainfallError, Result};

/// Coefficients of an ordinary least squares fit, one per feature column,
/// plus the intercept. Never mutated after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl FittedModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        FittedModel {
            coefficients,
            intercept,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Dot product of `row` with the coefficients plus the intercept.
    pub fn predict(&self, row: ArrayView1<f64>) -> Result<f64> {
        if row.len() != self.n_features() {
            return Err(RainfallError::FeatureAlignment(format!(
                "row has {} features, model expects {}",
                row.len(),
                self.n_features()
            )));
        }
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok(row.dot(&coefficients) + self.intercept)
    }

    pub fn predict_batch(&self, matrix: ArrayView2<f64>) -> Result<Array1<f64>> {
        if matrix.ncols() != self.n_features() {
            return Err(RainfallError::FeatureAlignment(format!(
                "matrix has {} columns, model expects {}",
                matrix.ncols(),
                self.n_features()
            )));
        }
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok(matrix.dot(&coefficients) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn predict_is_dot_plus_intercept() {
        let model = FittedModel::new(vec![2.0, 0.5, -1.0], 5.0);
        let row = array![10.0, 4.0, 3.0];
        assert_eq!(model.predict(row.view()).unwrap(), 20.0 + 2.0 - 3.0 + 5.0);
    }

    #[test]
    fn predict_rejects_wrong_length() {
        let model = FittedModel::new(vec![1.0; 13], 0.0);
        let row = Array1::<f64>::zeros(12);
        assert!(matches!(
            model.predict(row.view()),
            Err(RainfallError::FeatureAlignment(_))
        ));
    }

    #[test]
    fn batch_matches_single_rows() {
        let model = FittedModel::new(vec![1.0, 2.0], -1.0);
        let x = array![[1.0, 1.0], [0.0, 3.0]];
        let batch = model.predict_batch(x.view()).unwrap();
        for (i, row) in x.rows().into_iter().enumerate() {
            assert_eq!(batch[i], model.predict(row).unwrap());
        }
    }
}
