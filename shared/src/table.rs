//! Life-expectancy table
//!
//! An explicitly constructed, immutable mapping from (country, sex) to a
//! base life expectancy. Built once at startup (from a file or from the
//! fallback dataset) and only read afterwards.

use crate::errors::{CalculationError, TableError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Upper bound accepted for any life expectancy figure
pub const MAX_LIFE_EXPECTANCY_YEARS: f64 = 150.0;

// ============================================================================
// Sex
// ============================================================================

/// Biological sex used to select a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiologicalSex::Male => "male",
            BiologicalSex::Female => "female",
        }
    }
}

impl fmt::Display for BiologicalSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BiologicalSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(BiologicalSex::Male),
            "female" | "f" => Ok(BiologicalSex::Female),
            _ => Err(format!("Unknown sex: {}", s)),
        }
    }
}

// ============================================================================
// Life expectancy value
// ============================================================================

/// A non-negative, finite number of years (may be fractional)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LifeExpectancyYears(f64);

impl LifeExpectancyYears {
    pub fn new(years: f64) -> Result<Self, CalculationError> {
        if !years.is_finite() || years < 0.0 || years > MAX_LIFE_EXPECTANCY_YEARS {
            return Err(CalculationError::InvalidLifeExpectancy(years));
        }
        Ok(Self(years))
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for LifeExpectancyYears {
    type Error = CalculationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LifeExpectancyYears> for f64 {
    fn from(value: LifeExpectancyYears) -> Self {
        value.0
    }
}

impl fmt::Display for LifeExpectancyYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Table
// ============================================================================

/// One country's row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryLifeExpectancy {
    pub country: String,
    pub male: LifeExpectancyYears,
    pub female: LifeExpectancyYears,
}

impl CountryLifeExpectancy {
    pub fn for_sex(&self, sex: BiologicalSex) -> LifeExpectancyYears {
        match sex {
            BiologicalSex::Male => self.male,
            BiologicalSex::Female => self.female,
        }
    }
}

/// Where the table came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum TableSource {
    File(String),
    Fallback,
}

impl TableSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TableSource::Fallback)
    }
}

/// Ranking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Highest life expectancy first
    Top,
    /// Lowest life expectancy first
    Bottom,
}

/// Immutable life-expectancy table
#[derive(Debug, Clone)]
pub struct LifeExpectancyTable {
    entries: Vec<CountryLifeExpectancy>,
    source: TableSource,
}

impl LifeExpectancyTable {
    /// Build a table, rejecting empty input and duplicate country names
    pub fn new(
        entries: Vec<CountryLifeExpectancy>,
        source: TableSource,
    ) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(normalize_country(&entry.country)) {
                return Err(TableError::DuplicateCountry(entry.country.clone()));
            }
        }

        Ok(Self { entries, source })
    }

    /// Built-in dataset used when no real source is available
    pub fn fallback() -> Self {
        let entries = FALLBACK_DATA
            .iter()
            .map(|&(country, male, female)| CountryLifeExpectancy {
                country: country.to_string(),
                male: LifeExpectancyYears(male),
                female: LifeExpectancyYears(female),
            })
            .collect();

        Self {
            entries,
            source: TableSource::Fallback,
        }
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CountryLifeExpectancy] {
        &self.entries
    }

    /// Country names in table order
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.country.as_str())
    }

    /// Find a country row (trimmed, case-insensitive)
    pub fn find(&self, country: &str) -> Option<&CountryLifeExpectancy> {
        let wanted = normalize_country(country);
        self.entries
            .iter()
            .find(|e| normalize_country(&e.country) == wanted)
    }

    /// Look up the base life expectancy for a country and sex
    pub fn lookup(
        &self,
        country: &str,
        sex: BiologicalSex,
    ) -> Result<LifeExpectancyYears, CalculationError> {
        self.find(country)
            .map(|e| e.for_sex(sex))
            .ok_or_else(|| CalculationError::MissingCountryData {
                country: country.trim().to_string(),
                sex,
            })
    }

    /// The `n` highest or lowest countries for a sex.
    ///
    /// Ties are broken by country name so the result is deterministic.
    pub fn ranked(&self, sex: BiologicalSex, order: RankOrder, n: usize) -> Vec<&CountryLifeExpectancy> {
        let mut rows: Vec<&CountryLifeExpectancy> = self.entries.iter().collect();
        rows.sort_by(|a, b| {
            let by_value = a
                .for_sex(sex)
                .value()
                .partial_cmp(&b.for_sex(sex).value())
                .unwrap_or(Ordering::Equal);
            let by_value = match order {
                RankOrder::Top => by_value.reverse(),
                RankOrder::Bottom => by_value,
            };
            by_value.then_with(|| a.country.cmp(&b.country))
        });
        rows.truncate(n);
        rows
    }
}

fn normalize_country(name: &str) -> String {
    name.trim().to_lowercase()
}

/// (country, male, female) in years
const FALLBACK_DATA: [(&str, f64, f64); 5] = [
    ("Japan", 81.1, 87.1),
    ("Switzerland", 81.6, 85.4),
    ("United States", 74.5, 80.2),
    ("India", 70.0, 72.5),
    ("Nigeria", 53.0, 55.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(country: &str, male: f64, female: f64) -> CountryLifeExpectancy {
        CountryLifeExpectancy {
            country: country.to_string(),
            male: LifeExpectancyYears::new(male).unwrap(),
            female: LifeExpectancyYears::new(female).unwrap(),
        }
    }

    #[test]
    fn test_fallback_has_five_countries() {
        let table = LifeExpectancyTable::fallback();
        assert_eq!(table.len(), 5);
        assert!(table.source().is_fallback());
        assert_eq!(
            table.lookup("Japan", BiologicalSex::Female).unwrap().value(),
            87.1
        );
    }

    #[rstest]
    #[case("japan")]
    #[case("  JAPAN ")]
    #[case("Japan")]
    fn test_lookup_is_case_insensitive(#[case] name: &str) {
        let table = LifeExpectancyTable::fallback();
        assert_eq!(table.lookup(name, BiologicalSex::Male).unwrap().value(), 81.1);
    }

    #[test]
    fn test_lookup_missing_country_fails() {
        let table = LifeExpectancyTable::fallback();
        let err = table.lookup("Atlantis", BiologicalSex::Male).unwrap_err();
        assert_eq!(
            err,
            CalculationError::MissingCountryData {
                country: "Atlantis".to_string(),
                sex: BiologicalSex::Male,
            }
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = LifeExpectancyTable::new(vec![], TableSource::Fallback);
        assert_eq!(result.unwrap_err(), TableError::Empty);
    }

    #[test]
    fn test_duplicate_country_rejected() {
        let result = LifeExpectancyTable::new(
            vec![row("France", 79.0, 85.0), row("france ", 80.0, 86.0)],
            TableSource::File("le.csv".to_string()),
        );
        assert!(matches!(result, Err(TableError::DuplicateCountry(_))));
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(151.0)]
    fn test_invalid_life_expectancy_rejected(#[case] years: f64) {
        assert!(LifeExpectancyYears::new(years).is_err());
    }

    #[test]
    fn test_ranked_top_and_bottom() {
        let table = LifeExpectancyTable::fallback();

        let top: Vec<&str> = table
            .ranked(BiologicalSex::Male, RankOrder::Top, 2)
            .iter()
            .map(|e| e.country.as_str())
            .collect();
        assert_eq!(top, vec!["Switzerland", "Japan"]);

        let bottom: Vec<&str> = table
            .ranked(BiologicalSex::Female, RankOrder::Bottom, 2)
            .iter()
            .map(|e| e.country.as_str())
            .collect();
        assert_eq!(bottom, vec!["Nigeria", "India"]);
    }

    #[test]
    fn test_ranked_breaks_ties_by_name() {
        let table = LifeExpectancyTable::new(
            vec![row("Zeta", 70.0, 70.0), row("Alpha", 70.0, 70.0)],
            TableSource::Fallback,
        )
        .unwrap();

        let top = table.ranked(BiologicalSex::Male, RankOrder::Top, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].country, "Alpha");
    }

    #[test]
    fn test_serde_rejects_negative_years() {
        let result: Result<LifeExpectancyYears, _> = serde_json::from_str("-3.0");
        assert!(result.is_err());
        let ok: LifeExpectancyYears = serde_json::from_str("78.6").unwrap();
        assert_eq!(ok.value(), 78.6);
    }
}
