//! Annual rainfall prediction from monthly figures, plus historical
//! per-subdivision statistics.
//!
//! Training ([`model::train`]) encodes the historical dataset, fits an
//! ordinary least squares model and persists it together with the
//! [`features::FeatureColumnList`] it was fitted on. At inference time
//! [`prediction::PredictionService`] is built once from those two artifacts
//! and every request is encoded and aligned against the persisted columns,
//! never against a freshly recomputed list.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data_handling;
pub mod error;
pub mod features;
pub mod helper_functions;
pub mod insights;
pub mod model;
pub mod models;
pub mod prediction;

pub use error::{RainfallError, Result};
