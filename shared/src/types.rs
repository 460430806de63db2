//! API request and response types

use crate::countdown::{CounterId, CounterSeed};
use crate::diagnostics::Diagnostic;
use crate::lifestyle::{GymTenure, LifestyleFactors, SmokeTenure};
use crate::table::{BiologicalSex, TableSource};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Calculation
// ============================================================================

fn default_birth_time() -> NaiveTime {
    NaiveTime::default()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Calculation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub birth_date: NaiveDate,
    #[serde(default = "default_birth_time")]
    pub birth_time: NaiveTime,
    /// IANA timezone of the birth date and time
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub sex: BiologicalSex,
    pub country: String,
    #[serde(default)]
    pub gym: Option<GymTenure>,
    #[serde(default)]
    pub smoking: Option<SmokeTenure>,
    #[serde(default)]
    pub cancer: bool,
    /// Evaluate as of this instant instead of the server clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
}

impl CalculateRequest {
    pub fn lifestyle(&self) -> LifestyleFactors {
        LifestyleFactors {
            gym: self.gym,
            smoking: self.smoking,
            cancer: self.cancer,
        }
    }
}

/// One projected row (the person, or one comparison country)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub counter_id: CounterId,
    pub country: String,
    /// Position within its ranking; absent for the primary row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub base_years: f64,
    pub effective_years: f64,
    pub death_instant: DateTime<Utc>,
    /// Death instant as civil time in the birth timezone
    pub death_local: String,
    pub seconds_lived: u64,
    pub seconds_remaining: u64,
    pub seconds_remaining_display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Calculation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub calculation_id: String,
    pub calculated_at: DateTime<Utc>,
    pub birth_instant: DateTime<Utc>,
    pub timezone: String,
    pub sex: BiologicalSex,
    pub adjustment_years: i32,
    pub primary: ProjectionRow,
    pub top: Vec<ProjectionRow>,
    pub bottom: Vec<ProjectionRow>,
    pub table_source: TableSource,
    /// Seeds for every counter created by this calculation
    pub counters: Vec<CounterSeed>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

// ============================================================================
// Table
// ============================================================================

/// One country in the table listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryResponse {
    pub country: String,
    pub male: f64,
    pub female: f64,
}

/// Table listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub source: TableSource,
    pub count: usize,
    pub countries: Vec<CountryResponse>,
}

/// Ranking query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsQuery {
    pub sex: BiologicalSex,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCountry {
    pub rank: usize,
    pub country: String,
    pub life_expectancy: f64,
}

/// Highest and lowest countries for one sex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsResponse {
    pub sex: BiologicalSex,
    pub top: Vec<RankedCountry>,
    pub bottom: Vec<RankedCountry>,
}

// ============================================================================
// Countdown
// ============================================================================

/// Counter value as pushed to the display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterUpdateResponse {
    pub counter_id: CounterId,
    pub value: u64,
    pub display: String,
}

/// Current values of all live counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownSnapshotResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<String>,
    pub counters: Vec<CounterUpdateResponse>,
}

/// Result of tearing down the counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposeResponse {
    pub disposed: usize,
}
