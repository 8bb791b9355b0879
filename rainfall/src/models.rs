use std::fmt;
use std::str::FromStr;

use crate::error::{RainfallError, Result};

pub const SUBDIVISION_COL: &str = "SUBDIVISION";
pub const ANNUAL_COL: &str = "ANNUAL";

/// Calendar month codes, as they appear in the dataset header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    /// Position in calendar order, 0 for January.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn codes() -> Vec<&'static str> {
        Month::ALL.iter().map(|m| m.code()).collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Month {
    type Err = RainfallError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Month::ALL
            .into_iter()
            .find(|m| m.code() == upper)
            .ok_or_else(|| RainfallError::InvalidInput(format!("unknown month code '{s}'")))
    }
}

/// Twelve monthly totals in mm, indexed by [`Month::index`].
pub type MonthValues = [f64; 12];

/// One row of the historical dataset. `annual_total` is an independently
/// supplied column and need not equal the sum of the months.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub subdivision: String,
    pub month_values: MonthValues,
    pub annual_total: f64,
}

impl HistoricalRecord {
    pub fn month(&self, month: Month) -> f64 {
        self.month_values[month.index()]
    }
}

/// A single prediction request from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub subdivision: String,
    pub month_values: MonthValues,
}

impl InferenceRequest {
    pub fn new(subdivision: impl Into<String>, month_values: MonthValues) -> Self {
        InferenceRequest {
            subdivision: subdivision.into(),
            month_values,
        }
    }

    /// The only validation performed on user input: every month must be a
    /// finite, non-negative number.
    pub fn validate(&self) -> Result<()> {
        for month in Month::ALL {
            let v = self.month_values[month.index()];
            if !v.is_finite() || v < 0.0 {
                return Err(RainfallError::InvalidInput(format!(
                    "{month} rainfall must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// A record the feature encoder can expand: one categorical value plus a
/// fixed-length run of numeric fields.
pub trait EncodableRecord {
    fn category(&self) -> &str;
    fn numeric_values(&self) -> &[f64];
}

impl EncodableRecord for HistoricalRecord {
    fn category(&self) -> &str {
        &self.subdivision
    }

    fn numeric_values(&self) -> &[f64] {
        &self.month_values
    }
}

impl EncodableRecord for InferenceRequest {
    fn category(&self) -> &str {
        &self.subdivision
    }

    fn numeric_values(&self) -> &[f64] {
        &self.month_values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_codes_are_calendar_ordered() {
        assert_eq!(Month::codes().first(), Some(&"JAN"));
        assert_eq!(Month::codes().last(), Some(&"DEC"));
        assert_eq!(Month::Jul.index(), 6);
        assert_eq!("jul".parse::<Month>().unwrap(), Month::Jul);
        assert!("JULY".parse::<Month>().is_err());
    }

    #[test]
    fn request_validation_rejects_negative_and_nan() {
        let mut values = [10.0; 12];
        assert!(InferenceRequest::new("ALPHA", values).validate().is_ok());

        values[3] = -1.0;
        assert!(matches!(
            InferenceRequest::new("ALPHA", values).validate(),
            Err(RainfallError::InvalidInput(_))
        ));

        values[3] = f64::NAN;
        assert!(InferenceRequest::new("ALPHA", values).validate().is_err());
    }
}
