//! JSON persistence of the fitted model and its feature columns. The two files
//! are written together by training and must always be loaded together.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{RainfallError, Result};
use crate::features::FeatureColumnList;
use crate::model::FittedModel;

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub columns: PathBuf,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RainfallError::artifact(path, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| RainfallError::artifact(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| RainfallError::artifact(path, e))?;
    serde_json::from_str(&raw).map_err(|e| RainfallError::artifact(path, e))
}

impl ArtifactPaths {
    pub fn save(&self, model: &FittedModel, columns: &FeatureColumnList) -> Result<()> {
        write_json(&self.model, model)?;
        write_json(&self.columns, columns)
    }

    /// Load both artifacts and check that they describe the same feature
    /// layout.
    pub fn load(&self) -> Result<(FittedModel, FeatureColumnList)> {
        let model: FittedModel = read_json(&self.model)?;
        let columns: FeatureColumnList = read_json(&self.columns)?;
        if model.n_features() != columns.len() {
            return Err(RainfallError::FeatureAlignment(format!(
                "model at {} has {} coefficients but {} lists {} columns",
                self.model.display(),
                model.n_features(),
                self.columns.display(),
                columns.len()
            )));
        }
        info!(
            "Loaded model with {} features from {}",
            model.n_features(),
            self.model.display()
        );
        Ok((model, columns))
    }
}
