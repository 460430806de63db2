//! Error types for the OneLifeTime calculator

use crate::table::BiologicalSex;
use thiserror::Error;

/// Precondition violations raised before or during a projection.
///
/// Clamping outcomes (life expectancy floor, past projections) are not
/// errors; they are reported through [`crate::Diagnostic`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Local time {local} is ambiguous in {timezone}")]
    AmbiguousLocalTime { local: String, timezone: String },

    #[error("Local time {local} does not exist in {timezone}")]
    NonexistentLocalTime { local: String, timezone: String },

    #[error("Birth year {0} is outside the supported range")]
    BirthOutOfRange(i32),

    #[error("Invalid life expectancy: {0} years")]
    InvalidLifeExpectancy(f64),

    #[error("No life expectancy data for {country} ({sex})")]
    MissingCountryData { country: String, sex: BiologicalSex },
}

/// Countdown state errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    #[error("Counter {0} has been disposed")]
    Disposed(String),
}

/// Life-expectancy table construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Life expectancy table is empty")]
    Empty,

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Duplicate country: {0}")]
    DuplicateCountry(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
