use ndarray::Array1;
use tracing::{debug, warn};

use crate::error::{RainfallError, Result};
use crate::features::encoder::{EncodedRow, FeatureColumnList};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignmentMode {
    /// Zero-fill absent columns and drop unknown ones.
    #[default]
    Lenient,
    /// Reject anything that looks like schema drift. Only the reference
    /// category's indicator may be missing from the trained columns, and only
    /// indicator columns may be missing from the encoded row.
    Strict,
}

/// Reindex `row` against the training-time columns, one entry per trained
/// column in the trained order.
pub fn align(row: &EncodedRow, columns: &FeatureColumnList, mode: AlignmentMode) -> Result<Array1<f64>> {
    let reference = columns.reference_column();

    for (name, _) in row.iter() {
        if columns.position(name).is_some() {
            continue;
        }
        let expected_absence = reference.as_deref() == Some(name);
        match mode {
            AlignmentMode::Strict if !expected_absence => {
                return Err(RainfallError::FeatureAlignment(format!(
                    "column '{name}' is not among the {} trained columns",
                    columns.len()
                )));
            }
            AlignmentMode::Lenient if !expected_absence => {
                warn!("Dropping column '{}' unknown to the trained model", name);
            }
            _ => debug!("Dropping reference column '{}'", name),
        }
    }

    let aligned = columns
        .columns
        .iter()
        .map(|name| match row.get(name) {
            Some(v) => Ok(v),
            None if mode == AlignmentMode::Strict && !columns.is_indicator(name) => {
                Err(RainfallError::FeatureAlignment(format!(
                    "trained column '{name}' is missing from the encoded row"
                )))
            }
            None => Ok(0.0),
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(Array1::from(aligned))
}
