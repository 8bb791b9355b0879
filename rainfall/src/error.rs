use std::path::PathBuf;

use thiserror::Error;

/// Every failure the pipeline can surface. None of them are retryable: the
/// same input produces the same outcome.
#[derive(Debug, Error)]
pub enum RainfallError {
    #[error("failed to load dataset {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("feature alignment failed: {0}")]
    FeatureAlignment(String),

    #[error("no historical records for subdivision '{0}'")]
    NoData(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model fitting failed: {0}")]
    Fit(String),

    #[error("artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RainfallError>;

impl RainfallError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RainfallError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RainfallError::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
