use ndarray::ArrayView1;
use tracing::debug;

use crate::error::{RainfallError, Result};
use crate::features::{align, AlignmentMode, FeatureColumnList, FeatureEncoder};
use crate::model::{ArtifactPaths, FittedModel, TrainingReport};
use crate::models::InferenceRequest;

/// Predict from a row already aligned to the model's feature columns.
pub fn predict(model: &FittedModel, aligned_row: ArrayView1<f64>) -> Result<f64> {
    model.predict(aligned_row)
}

/// The fitted model and the column list it was trained with, bundled once at
/// startup and only read afterwards. Safe to share between threads.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: FittedModel,
    columns: FeatureColumnList,
    encoder: FeatureEncoder,
    mode: AlignmentMode,
}

impl PredictionService {
    pub fn new(model: FittedModel, columns: FeatureColumnList, mode: AlignmentMode) -> Result<Self> {
        if model.n_features() != columns.len() {
            return Err(RainfallError::FeatureAlignment(format!(
                "model has {} coefficients for {} feature columns",
                model.n_features(),
                columns.len()
            )));
        }
        // Requests are named by calendar month, whatever order the persisted
        // list uses; `align` reorders by name.
        Ok(PredictionService {
            model,
            columns,
            encoder: FeatureEncoder::default(),
            mode,
        })
    }

    pub fn from_artifacts(paths: &ArtifactPaths, mode: AlignmentMode) -> Result<Self> {
        let (model, columns) = paths.load()?;
        PredictionService::new(model, columns, mode)
    }

    pub fn from_report(report: &TrainingReport, mode: AlignmentMode) -> Result<Self> {
        PredictionService::new(report.model.clone(), report.columns.clone(), mode)
    }

    pub fn columns(&self) -> &FeatureColumnList {
        &self.columns
    }

    /// Validate, encode, align and predict the annual total in mm.
    pub fn predict(&self, request: &InferenceRequest) -> Result<f64> {
        request.validate()?;
        let encoded = self.encoder.encode_one(request)?;
        let row = align(&encoded, &self.columns, self.mode)?;
        let value = predict(&self.model, row.view())?;
        debug!("Predicted {:.2} mm for {}", value, request.subdivision);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use approx::assert_abs_diff_eq;

    fn alpha_beta_service(mode: AlignmentMode) -> PredictionService {
        let mut names: Vec<String> = Month::codes().into_iter().map(String::from).collect();
        names.push("SUBDIVISION_BETA".into());
        let columns = FeatureColumnList {
            categorical_field: "SUBDIVISION".into(),
            reference_category: Some("ALPHA".into()),
            columns: names,
        };
        // Annual = sum of months + 100 for BETA + 7
        let mut coefs = vec![1.0; 12];
        coefs.push(100.0);
        PredictionService::new(FittedModel::new(coefs, 7.0), columns, mode).unwrap()
    }

    #[test]
    fn reference_and_trained_categories_predict() {
        let service = alpha_beta_service(AlignmentMode::Lenient);
        let alpha = service.predict(&InferenceRequest::new("ALPHA", [10.0; 12])).unwrap();
        let beta = service.predict(&InferenceRequest::new("BETA", [10.0; 12])).unwrap();
        assert_abs_diff_eq!(alpha, 127.0);
        assert_abs_diff_eq!(beta, 227.0);
    }

    #[test]
    fn negative_input_is_rejected_before_prediction() {
        let service = alpha_beta_service(AlignmentMode::Lenient);
        let mut values = [10.0; 12];
        values[Month::Jul.index()] = -3.0;
        assert!(matches!(
            service.predict(&InferenceRequest::new("BETA", values)),
            Err(RainfallError::InvalidInput(_))
        ));
    }

    #[test]
    fn strict_service_rejects_unknown_subdivision() {
        let lenient = alpha_beta_service(AlignmentMode::Lenient);
        let strict = alpha_beta_service(AlignmentMode::Strict);
        let req = InferenceRequest::new("ZETA", [10.0; 12]);
        assert_abs_diff_eq!(lenient.predict(&req).unwrap(), 127.0);
        assert!(matches!(
            strict.predict(&req),
            Err(RainfallError::FeatureAlignment(_))
        ));
    }

    #[test]
    fn mismatched_model_and_columns_fail_at_construction() {
        let columns = alpha_beta_service(AlignmentMode::Lenient).columns().clone();
        let model = FittedModel::new(vec![1.0; 12], 0.0);
        assert!(matches!(
            PredictionService::new(model, columns, AlignmentMode::Lenient),
            Err(RainfallError::FeatureAlignment(_))
        ));
    }

    #[test]
    fn persisted_column_order_does_not_matter() {
        let mut names: Vec<String> = Month::codes().into_iter().rev().map(String::from).collect();
        names.push("SUBDIVISION_BETA".into());
        let columns = FeatureColumnList {
            categorical_field: "SUBDIVISION".into(),
            reference_category: Some("ALPHA".into()),
            columns: names,
        };
        // Only JAN (listed last of the months) carries weight
        let mut coefs = vec![0.0; 13];
        coefs[11] = 1.0;
        let model = FittedModel::new(coefs, 0.0);

        let mut values = [0.0; 12];
        values[Month::Jan.index()] = 100.0;
        let req = InferenceRequest::new("BETA", values);
        for mode in [AlignmentMode::Lenient, AlignmentMode::Strict] {
            let service = PredictionService::new(model.clone(), columns.clone(), mode).unwrap();
            assert_abs_diff_eq!(service.predict(&req).unwrap(), 100.0);
        }
    }

    #[test]
    fn strict_service_rejects_unknown_numeric_column() {
        let mut names: Vec<String> = Month::codes().into_iter().map(String::from).collect();
        names.push("YEAR".into());
        names.push("SUBDIVISION_BETA".into());
        let columns = FeatureColumnList {
            categorical_field: "SUBDIVISION".into(),
            reference_category: Some("ALPHA".into()),
            columns: names,
        };
        let model = FittedModel::new(vec![1.0; 14], 0.0);
        let req = InferenceRequest::new("ALPHA", [10.0; 12]);

        let lenient = PredictionService::new(model.clone(), columns.clone(), AlignmentMode::Lenient).unwrap();
        assert_abs_diff_eq!(lenient.predict(&req).unwrap(), 120.0);
        let strict = PredictionService::new(model, columns, AlignmentMode::Strict).unwrap();
        assert!(matches!(
            strict.predict(&req),
            Err(RainfallError::FeatureAlignment(_))
        ));
    }

    #[test]
    fn service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PredictionService>();
    }
}
