//! One-hot expansion of a single categorical field next to a fixed run of
//! numeric fields.
//!
//! Distinct categorical values are enumerated in lexicographic order and the
//! first one is the reference category: it gets no indicator column, so a row
//! of the reference category is all zeros across the indicator columns. This
//! ordering is part of the persisted contract. Changing it would silently shift
//! every indicator coefficient of a previously fitted model.

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RainfallError, Result};
use crate::models::{EncodableRecord, Month, SUBDIVISION_COL};

/// Separator between the field name and the category value in indicator
/// column names, e.g. `SUBDIVISION_KERALA`.
pub const PREFIX_SEP: char = '_';

/// The authoritative, ordered list of design-matrix columns produced at
/// training time. Inference never recomputes it; it is loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumnList {
    pub categorical_field: String,
    /// The dropped category, `None` when the training set had no rows.
    pub reference_category: Option<String>,
    pub columns: Vec<String>,
}

impl FeatureColumnList {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_indicator(&self, name: &str) -> bool {
        indicator_value(&self.categorical_field, name).is_some()
    }

    /// Indicator column the reference category would have had.
    pub fn reference_column(&self) -> Option<String> {
        self.reference_category
            .as_deref()
            .map(|v| indicator_name(&self.categorical_field, v))
    }
}

/// The numeric design matrix plus the names of its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMatrix {
    pub matrix: Array2<f64>,
    pub columns: FeatureColumnList,
}

/// One encoded record as column name → value, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow(Vec<(String, f64)>);

impl EncodedRow {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(c, _)| c == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(c, v)| (c.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn indicator_name(field: &str, value: &str) -> String {
    format!("{field}{PREFIX_SEP}{value}")
}

fn indicator_value<'a>(field: &str, column: &'a str) -> Option<&'a str> {
    column.strip_prefix(field)?.strip_prefix(PREFIX_SEP)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEncoder {
    categorical_field: String,
    numeric_fields: Vec<String>,
}

impl Default for FeatureEncoder {
    /// `SUBDIVISION` plus the twelve month codes in calendar order.
    fn default() -> Self {
        FeatureEncoder::new(SUBDIVISION_COL, Month::codes())
    }
}

impl FeatureEncoder {
    pub fn new<S: Into<String>>(
        categorical_field: impl Into<String>,
        numeric_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        FeatureEncoder {
            categorical_field: categorical_field.into(),
            numeric_fields: numeric_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn categorical_field(&self) -> &str {
        &self.categorical_field
    }

    pub fn numeric_fields(&self) -> &[String] {
        &self.numeric_fields
    }

    fn check_arity<R: EncodableRecord>(&self, row: &R) -> Result<()> {
        let got = row.numeric_values().len();
        if got != self.numeric_fields.len() {
            return Err(RainfallError::FeatureAlignment(format!(
                "record '{}' has {} numeric values, encoder expects {}",
                row.category(),
                got,
                self.numeric_fields.len()
            )));
        }
        Ok(())
    }

    /// Encode a whole table. Columns are the numeric fields in their original
    /// order followed by one indicator per non-reference category.
    pub fn encode<R: EncodableRecord>(&self, rows: &[R]) -> Result<EncodedMatrix> {
        for row in rows {
            self.check_arity(row)?;
        }

        let categories: Vec<&str> = rows
            .iter()
            .map(|r| r.category())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let (reference, dummies) = match categories.split_first() {
            Some((first, rest)) => (Some(first.to_string()), rest),
            None => (None, &[][..]),
        };

        let n_numeric = self.numeric_fields.len();
        let mut columns = self.numeric_fields.clone();
        columns.extend(
            dummies
                .iter()
                .map(|v| indicator_name(&self.categorical_field, v)),
        );

        let mut matrix = Array2::<f64>::zeros((rows.len(), columns.len()));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.numeric_values().iter().enumerate() {
                matrix[[i, j]] = v;
            }
            // binary_search on the sorted dummies; the reference is not in it
            if let Ok(k) = dummies.binary_search(&row.category()) {
                matrix[[i, n_numeric + k]] = 1.0;
            }
        }

        debug!(
            "Encoded {} rows into {} columns (reference category {:?})",
            rows.len(),
            columns.len(),
            reference
        );

        Ok(EncodedMatrix {
            matrix,
            columns: FeatureColumnList {
                categorical_field: self.categorical_field.clone(),
                reference_category: reference,
                columns,
            },
        })
    }

    /// Encode a single record for inference. A lone record has no reference
    /// category of its own, so its indicator column is always emitted; the
    /// aligner decides whether the trained model knows it.
    pub fn encode_one<R: EncodableRecord>(&self, row: &R) -> Result<EncodedRow> {
        self.check_arity(row)?;
        let mut values: Vec<(String, f64)> = self
            .numeric_fields
            .iter()
            .cloned()
            .zip(row.numeric_values().iter().copied())
            .collect();
        values.push((indicator_name(&self.categorical_field, row.category()), 1.0));
        Ok(EncodedRow(values))
    }
}
