//! Error types for tactile-core.

use thiserror::Error;

/// Error type for tactile-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid bounds: low={low}, high={high}")]
    InvalidBounds { low: f64, high: f64 },

    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Failure reported by a parameter setter.
///
/// Instrument-backed parameters return this when the hardware refuses a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Value {value} outside bounds [{low}, {high}]")]
    OutOfRange { value: f64, low: f64, high: f64 },

    #[error("Value rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
