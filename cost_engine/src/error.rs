//! Error types for the Cost Engine.
//!
//! Calculator input never fails (it is normalised instead), so the only
//! errors the library reports concern rate tables supplied from disk.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("failed to read rate table {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rate table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rate `{field}` must be a finite number between 0 and 1, got {value}")]
    Invalid { field: &'static str, value: f64 },
    #[error("income tax rate `{field}` must be below 1.0 to gross up net pay, got {value}")]
    IncomeRateTooHigh { field: &'static str, value: f64 },
}
