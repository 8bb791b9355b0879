use std::path::PathBuf;

use polars::prelude::*;
use tracing::{debug, error, info};

use crate::data_handling::{DataSource, RainfallDataset};
use crate::error::{RainfallError, Result};
use crate::helper_functions::read_csv;
use crate::models::{HistoricalRecord, Month, ANNUAL_COL, SUBDIVISION_COL};

/// The historical rainfall CSV: one row per subdivision per year with the
/// twelve month columns, `ANNUAL` and `SUBDIVISION`. Other columns are ignored.
pub struct RainfallCsv {
    pub path: PathBuf,
}

impl RainfallCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RainfallCsv { path: path.into() }
    }

    fn required_columns() -> Vec<&'static str> {
        let mut cols = vec![SUBDIVISION_COL];
        cols.extend(Month::codes());
        cols.push(ANNUAL_COL);
        cols
    }

    /// Keep the required columns, coerce the numeric ones to `Float64` and drop
    /// every row with a null in any of them.
    fn clean(&self, df: DataFrame) -> Result<DataFrame> {
        let required = Self::required_columns();
        let present = df.get_column_names();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !present.iter().any(|c| c.as_str() == *name))
            .collect();
        if !missing.is_empty() {
            error!("Dataset is missing required columns: {:?}", missing);
            return Err(RainfallError::data_load(
                &self.path,
                format!("missing required columns {}", missing.join(", ")),
            ));
        }

        let mut df = df.select(required)?;

        let s = df.column(SUBDIVISION_COL)?.cast(&DataType::String)?;
        df.with_column(s)?;
        for name in Month::codes().into_iter().chain([ANNUAL_COL]) {
            // Non-numeric cells become null and are dropped below
            let s = df.column(name)?.cast(&DataType::Float64)?;
            df.with_column(s)?;
        }

        let before = df.height();
        let df = df.drop_nulls::<String>(None)?;
        debug!("Dropped {} incomplete rows", before - df.height());
        Ok(df)
    }

    fn to_records(&self, df: &DataFrame) -> Result<Vec<HistoricalRecord>> {
        let subdivisions: Vec<&str> = df
            .column(SUBDIVISION_COL)?
            .str()?
            .into_no_null_iter()
            .collect();
        let annual: Vec<f64> = df.column(ANNUAL_COL)?.f64()?.into_no_null_iter().collect();

        let mut months: Vec<Vec<f64>> = Vec::with_capacity(12);
        for month in Month::ALL {
            months.push(
                df.column(month.code())?
                    .f64()?
                    .into_no_null_iter()
                    .collect(),
            );
        }

        let records = subdivisions
            .into_iter()
            .enumerate()
            .map(|(i, sub)| {
                let mut month_values = [0.0; 12];
                for month in Month::ALL {
                    month_values[month.index()] = months[month.index()][i];
                }
                HistoricalRecord {
                    subdivision: sub.to_string(),
                    month_values,
                    annual_total: annual[i],
                }
            })
            .collect();
        Ok(records)
    }
}

impl DataSource for RainfallCsv {
    fn load(&self) -> Result<RainfallDataset> {
        info!("Reading rainfall data from {}", self.path.display());
        let raw = match read_csv(&self.path) {
            Ok(df) => df,
            Err(e) => {
                error!("Failed to read rainfall CSV: {}", e);
                return Err(RainfallError::data_load(&self.path, e));
            }
        };
        info!("Initial shape: {:?}", raw.shape());

        let df = self.clean(raw)?;
        info!("After cleaning: {:?}", df.shape());

        if df.height() == 0 {
            return Err(RainfallError::data_load(&self.path, "no complete rows"));
        }

        Ok(RainfallDataset::new(self.to_records(&df)?))
    }
}
