//! Input validation functions
//!
//! Checks applied at the input boundary, before any projection runs.

use crate::projection::{parse_timezone, MAX_BIRTH_YEAR, MIN_BIRTH_YEAR};
use crate::table::MAX_LIFE_EXPECTANCY_YEARS;
use chrono::{Datelike, NaiveDate};

/// Most comparison rows shown per ranking
pub const MAX_COMPARISON_COUNT: usize = 50;

/// Validate an IANA timezone identifier
pub fn validate_timezone(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Timezone cannot be empty".to_string());
    }
    parse_timezone(name)
        .map(|_| ())
        .map_err(|_| format!("Unknown timezone: {}", name))
}

/// Validate a birth date.
///
/// Future dates are allowed; they produce a zero seconds-lived counter.
pub fn validate_birth_date(date: NaiveDate) -> Result<(), String> {
    if date.year() < MIN_BIRTH_YEAR {
        return Err(format!("Birth year must be at least {}", MIN_BIRTH_YEAR));
    }
    if date.year() > MAX_BIRTH_YEAR {
        return Err(format!("Birth year must be at most {}", MAX_BIRTH_YEAR));
    }
    Ok(())
}

/// Validate a country name
pub fn validate_country(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Country cannot be empty".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Country name too long".to_string());
    }
    Ok(())
}

/// Validate a life expectancy figure (in years)
pub fn validate_life_expectancy(years: f64) -> Result<(), String> {
    if years.is_nan() || years.is_infinite() {
        return Err("Life expectancy must be a valid number".to_string());
    }
    if years < 0.0 {
        return Err("Life expectancy cannot be negative".to_string());
    }
    if years > MAX_LIFE_EXPECTANCY_YEARS {
        return Err(format!(
            "Life expectancy must be at most {} years",
            MAX_LIFE_EXPECTANCY_YEARS
        ));
    }
    Ok(())
}

/// Validate how many comparison countries to show per ranking
pub fn validate_comparison_count(count: usize) -> Result<(), String> {
    if count == 0 {
        return Err("Comparison count must be at least 1".to_string());
    }
    if count > MAX_COMPARISON_COUNT {
        return Err(format!(
            "Comparison count must be at most {}",
            MAX_COMPARISON_COUNT
        ));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "birth_date" => "Date of Birth",
        "birth_time" => "Time of Birth",
        "timezone" => "Timezone",
        "sex" => "Sex",
        "country" => "Country",
        "gym" => "Gym Tenure",
        "smoking" => "Smoking Tenure",
        "cancer" => "Cancer Diagnosis",
        "count" => "Number of Countries",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Europe/Paris").is_ok());
        assert!(validate_timezone(" America/New_York ").is_ok());
        assert!(validate_timezone("").is_err());
        assert!(validate_timezone("Europe/Atlantis").is_err());
    }

    #[test]
    fn test_validate_birth_date() {
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()).is_ok());
        // future births are a policy case, not an error
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(2100, 1, 1).unwrap()).is_ok());
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(999, 12, 31).unwrap()).is_err());
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(9001, 1, 1).unwrap()).is_err());
    }

    #[test]
    fn test_validate_country() {
        assert!(validate_country("Japan").is_ok());
        assert!(validate_country("   ").is_err());
        assert!(validate_country(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_life_expectancy() {
        assert!(validate_life_expectancy(0.0).is_ok());
        assert!(validate_life_expectancy(78.6).is_ok());
        assert!(validate_life_expectancy(-0.1).is_err());
        assert!(validate_life_expectancy(150.1).is_err());
        assert!(validate_life_expectancy(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_comparison_count() {
        assert!(validate_comparison_count(5).is_ok());
        assert!(validate_comparison_count(0).is_err());
        assert!(validate_comparison_count(51).is_err());
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("birth_date", "must be after 1000");
        assert_eq!(err.display_label, "Date of Birth");
        assert_eq!(err.user_message(), "Date of Birth: must be after 1000");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_life_expectancy_range(years in 0.0f64..=150.0) {
            prop_assert!(validate_life_expectancy(years).is_ok());
        }

        #[test]
        fn prop_invalid_life_expectancy_above_max(years in 150.1f64..1000.0) {
            prop_assert!(validate_life_expectancy(years).is_err());
        }
    }
}
