//! Runtime configuration, read from `<project root>/rainfall.json` when present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RainfallError, Result};

pub const CONFIG_FILE: &str = "rainfall.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub columns_path: PathBuf,
    pub chart_dir: PathBuf,
    /// Fraction of rows held out for the R² diagnostic.
    pub test_size: f64,
    pub split_seed: u64,
    pub strict_alignment: bool,
    /// Pre-filled value for every month prompt in the dashboard.
    pub default_month_value: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: PathBuf::from("data/rainfall.csv"),
            model_path: PathBuf::from("model/rainfall_model.json"),
            columns_path: PathBuf::from("model/feature_columns.json"),
            chart_dir: PathBuf::from("charts"),
            test_size: 0.2,
            split_seed: 42,
            strict_alignment: false,
            default_month_value: 50.0,
        }
    }
}

impl AppConfig {
    /// Load the config file under `root` (defaults if it does not exist) and
    /// resolve every relative path against `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let config = if path.exists() {
            info!("Reading configuration from {}", path.display());
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str::<AppConfig>(&raw)
                .map_err(|e| RainfallError::artifact(&path, e))?
        } else {
            debug!("No {} under {}, using defaults", CONFIG_FILE, root.display());
            AppConfig::default()
        };

        if !(0.0..1.0).contains(&config.test_size) {
            return Err(RainfallError::InvalidInput(format!(
                "test_size must be in [0, 1), got {}",
                config.test_size
            )));
        }

        Ok(config.resolved(root))
    }

    fn resolved(mut self, root: &Path) -> Self {
        for path in [
            &mut self.data_path,
            &mut self.model_path,
            &mut self.columns_path,
            &mut self.chart_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.data_path, dir.path().join("data/rainfall.csv"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.split_seed, 42);
        assert!(!config.strict_alignment);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "strict_alignment": true, "model_path": "/tmp/m.json" }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert!(config.strict_alignment);
        assert_eq!(config.model_path, PathBuf::from("/tmp/m.json"));
        assert_eq!(config.columns_path, dir.path().join("model/feature_columns.json"));
        assert_eq!(config.default_month_value, 50.0);
    }

    #[test]
    fn rejects_out_of_range_test_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{ "test_size": 1.5 }"#).unwrap();
        assert!(matches!(
            AppConfig::load(dir.path()),
            Err(RainfallError::InvalidInput(_))
        ));
    }
}
