//! Historical statistics read straight from the loaded dataset; the model is
//! not involved.

use statrs::statistics::Statistics;

use crate::data_handling::RainfallDataset;
use crate::error::{RainfallError, Result};
use crate::models::{HistoricalRecord, Month};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Records of `subdivision`, or `NoData` if there are none.
pub fn subdivision_records<'a>(
    dataset: &'a RainfallDataset,
    subdivision: &str,
) -> Result<Vec<&'a HistoricalRecord>> {
    let records = dataset.records_for(subdivision);
    if records.is_empty() {
        return Err(RainfallError::NoData(subdivision.to_string()));
    }
    Ok(records)
}

pub fn stats(dataset: &RainfallDataset, subdivision: &str, month: Month) -> Result<MonthStats> {
    let values: Vec<f64> = subdivision_records(dataset, subdivision)?
        .iter()
        .map(|r| r.month(month))
        .collect();

    // Qualified calls: Iterator::min/max would shadow the f64 versions
    Ok(MonthStats {
        mean: Statistics::mean(&values),
        min: Statistics::min(&values),
        max: Statistics::max(&values),
    })
}

/// Mean rainfall of each month across all years of `subdivision`, January
/// first.
pub fn trend(dataset: &RainfallDataset, subdivision: &str) -> Result<[f64; 12]> {
    let records = subdivision_records(dataset, subdivision)?;
    let mut out = [0.0; 12];
    for month in Month::ALL {
        out[month.index()] = records.iter().map(|r| r.month(month)).mean();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(sub: &str, jul: f64) -> HistoricalRecord {
        let mut month_values = [1.0; 12];
        month_values[Month::Jul.index()] = jul;
        month_values[Month::Dec.index()] = jul / 10.0;
        HistoricalRecord {
            subdivision: sub.to_string(),
            month_values,
            annual_total: 0.0,
        }
    }

    fn dataset() -> RainfallDataset {
        RainfallDataset::new(vec![
            record("BETA", 10.0),
            record("ALPHA", 500.0),
            record("BETA", 30.0),
            record("BETA", 20.0),
        ])
    }

    #[test]
    fn july_stats_for_beta() {
        let s = stats(&dataset(), "BETA", Month::Jul).unwrap();
        assert_abs_diff_eq!(s.mean, 20.0);
        assert_abs_diff_eq!(s.min, 10.0);
        assert_abs_diff_eq!(s.max, 30.0);
    }

    #[test]
    fn absent_subdivision_is_no_data() {
        let ds = dataset();
        assert!(matches!(
            stats(&ds, "GAMMA", Month::Jul),
            Err(RainfallError::NoData(_))
        ));
        assert!(matches!(trend(&ds, "GAMMA"), Err(RainfallError::NoData(_))));
    }

    #[test]
    fn trend_is_calendar_ordered_monthly_mean() {
        let t = trend(&dataset(), "BETA").unwrap();
        assert_abs_diff_eq!(t[Month::Jan.index()], 1.0);
        assert_abs_diff_eq!(t[Month::Jul.index()], 20.0);
        assert_abs_diff_eq!(t[Month::Dec.index()], 2.0);
        assert!(t.iter().all(|v| v.is_finite()));
    }
}
