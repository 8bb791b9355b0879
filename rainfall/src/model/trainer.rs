//! Ordinary least squares on the encoded design matrix, with a seeded
//! hold-out split whose R² is reported as a diagnostic only.

use linfa::prelude::*;
use linfa_linear::LinearRegression;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::data_handling::RainfallDataset;
use crate::error::{RainfallError, Result};
use crate::features::{FeatureColumnList, FeatureEncoder};
use crate::model::FittedModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            test_size: 0.2,
            seed: 42,
        }
    }
}

pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: FittedModel,
    pub columns: FeatureColumnList,
    /// Held-out R², `None` when the dataset was too small to split.
    pub r2: Option<f64>,
    pub n_train: usize,
    pub n_test: usize,
}

/// Fit an intercept plus one coefficient per column. Deterministic: the same
/// matrix and targets always yield the same coefficients.
pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<FittedModel> {
    if x.nrows() == 0 {
        return Err(RainfallError::Fit("empty training matrix".into()));
    }
    if x.nrows() != y.len() {
        return Err(RainfallError::Fit(format!(
            "{} rows but {} targets",
            x.nrows(),
            y.len()
        )));
    }

    let dataset = Dataset::new(x.clone(), y.clone());
    let fitted = LinearRegression::new()
        .fit(&dataset)
        .map_err(|e| RainfallError::Fit(e.to_string()))?;

    Ok(FittedModel::new(fitted.params().to_vec(), fitted.intercept()))
}

/// Shuffle row indices with a seeded `StdRng` and hold out
/// `ceil(n * test_size)` of them.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Split {
    let n = x.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let n_test = ((n as f64) * test_size).ceil() as usize;
    let (test_idx, train_idx) = order.split_at(n_test.min(n));

    Split {
        x_train: x.select(Axis(0), train_idx),
        y_train: y.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_test: y.select(Axis(0), test_idx),
    }
}

/// Coefficient of determination of `model` on the given rows.
pub fn r2_score(model: &FittedModel, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
    let predicted = model.predict_batch(x.view())?;
    predicted
        .r2(y)
        .map_err(|e| RainfallError::Fit(format!("r2 computation failed: {e}")))
}

/// Fit on the train part of the split and score on the test part. Returns
/// `None` when R² is undefined for the split: an empty train part, fewer than
/// two test rows, or test targets that are all equal.
pub fn evaluate(x: &Array2<f64>, y: &Array1<f64>, options: TrainOptions) -> Result<Option<(f64, usize, usize)>> {
    let split = train_test_split(x, y, options.test_size, options.seed);
    let (n_train, n_test) = (split.y_train.len(), split.y_test.len());
    if n_train == 0 || n_test < 2 {
        warn!(
            "Skipping hold-out evaluation ({} train / {} test rows)",
            n_train, n_test
        );
        return Ok(None);
    }
    if split.y_test.iter().all(|v| *v == split.y_test[0]) {
        warn!("Skipping hold-out evaluation: the {} test targets are all equal", n_test);
        return Ok(None);
    }

    let model = fit(&split.x_train, &split.y_train)?;
    let r2 = r2_score(&model, &split.x_test, &split.y_test)?;
    Ok(Some((r2, n_train, n_test)))
}

/// Encode the dataset, report the hold-out R², then refit on every row. The
/// returned column list is the one to persist next to the model.
pub fn train(dataset: &RainfallDataset, encoder: &FeatureEncoder, options: TrainOptions) -> Result<TrainingReport> {
    let encoded = encoder.encode(dataset.records())?;
    let y = Array1::from(dataset.annual_totals());
    info!(
        "Design matrix: {} rows x {} columns",
        encoded.matrix.nrows(),
        encoded.matrix.ncols()
    );

    let (r2, n_train, n_test) = match evaluate(&encoded.matrix, &y, options)? {
        Some((r2, n_train, n_test)) => {
            info!("R2 Score: {:.4} ({} train / {} test rows)", r2, n_train, n_test);
            (Some(r2), n_train, n_test)
        }
        None => (None, y.len(), 0),
    };

    let model = fit(&encoded.matrix, &y)?;
    for (name, coef) in encoded.columns.columns.iter().zip(model.coefficients()) {
        debug!("{:<40} {:>12.6}", name, coef);
    }
    debug!("{:<40} {:>12.6}", "(intercept)", model.intercept());

    Ok(TrainingReport {
        model,
        columns: encoded.columns,
        r2,
        n_train,
        n_test,
    })
}
