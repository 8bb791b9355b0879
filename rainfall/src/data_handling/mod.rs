pub mod rainfall_csv;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::HistoricalRecord;

/// Anything that can produce the in-memory historical dataset.
pub trait DataSource {
    fn load(&self) -> Result<RainfallDataset>;
}

/// The cleaned historical records, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RainfallDataset {
    records: Vec<HistoricalRecord>,
}

impl RainfallDataset {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        RainfallDataset { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct subdivision names in lexicographic order.
    pub fn subdivisions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.subdivision.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn records_for(&self, subdivision: &str) -> Vec<&HistoricalRecord> {
        self.records
            .iter()
            .filter(|r| r.subdivision == subdivision)
            .collect()
    }

    pub fn annual_totals(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.annual_total).collect()
    }
}
