//! Life-expectancy adjuster
//!
//! Applies lifestyle deltas to a base life expectancy. The three factors are
//! independent and strictly additive; the result never drops below
//! [`MIN_EFFECTIVE_YEARS`].

use crate::diagnostics::Diagnostic;
use crate::table::LifeExpectancyYears;
use serde::{Deserialize, Serialize};

/// Floor for effective life expectancy, in years
pub const MIN_EFFECTIVE_YEARS: f64 = 0.1;

/// Years removed by a cancer diagnosis
pub const CANCER_PENALTY_YEARS: i32 = -8;

// ============================================================================
// Lifestyle Factors
// ============================================================================

/// How long the person has been training at a gym
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GymTenure {
    /// Less than 1 year
    LessThanOneYear,
    /// 1 to 3 years
    OneToThreeYears,
    /// More than 3 years
    MoreThanThreeYears,
}

impl GymTenure {
    /// Years added to life expectancy
    pub fn delta_years(&self) -> i32 {
        match self {
            GymTenure::LessThanOneYear => 1,
            GymTenure::OneToThreeYears => 4,
            GymTenure::MoreThanThreeYears => 7,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GymTenure::LessThanOneYear => "Less than 1 year",
            GymTenure::OneToThreeYears => "1-3 years",
            GymTenure::MoreThanThreeYears => "More than 3 years",
        }
    }
}

impl std::str::FromStr for GymTenure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "less_than_one_year" | "<1" => Ok(GymTenure::LessThanOneYear),
            "one_to_three_years" | "1-3" => Ok(GymTenure::OneToThreeYears),
            "more_than_three_years" | ">3" => Ok(GymTenure::MoreThanThreeYears),
            _ => Err(format!("Unknown gym tenure: {}", s)),
        }
    }
}

/// How long the person has been smoking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokeTenure {
    /// Less than 1 year
    LessThanOneYear,
    /// 1 to 5 years
    OneToFiveYears,
    /// 5 to 10 years
    FiveToTenYears,
    /// More than 10 years
    MoreThanTenYears,
}

impl SmokeTenure {
    /// Years removed from life expectancy (always negative)
    pub fn delta_years(&self) -> i32 {
        match self {
            SmokeTenure::LessThanOneYear => -1,
            SmokeTenure::OneToFiveYears => -3,
            SmokeTenure::FiveToTenYears => -5,
            SmokeTenure::MoreThanTenYears => -10,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SmokeTenure::LessThanOneYear => "Less than 1 year",
            SmokeTenure::OneToFiveYears => "1-5 years",
            SmokeTenure::FiveToTenYears => "5-10 years",
            SmokeTenure::MoreThanTenYears => "More than 10 years",
        }
    }
}

impl std::str::FromStr for SmokeTenure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "less_than_one_year" | "<1" => Ok(SmokeTenure::LessThanOneYear),
            "one_to_five_years" | "1-5" => Ok(SmokeTenure::OneToFiveYears),
            "five_to_ten_years" | "5-10" => Ok(SmokeTenure::FiveToTenYears),
            "more_than_ten_years" | ">10" => Ok(SmokeTenure::MoreThanTenYears),
            _ => Err(format!("Unknown smoking tenure: {}", s)),
        }
    }
}

/// The full set of lifestyle selections. `None` means "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifestyleFactors {
    #[serde(default)]
    pub gym: Option<GymTenure>,
    #[serde(default)]
    pub smoking: Option<SmokeTenure>,
    #[serde(default)]
    pub cancer: bool,
}

impl LifestyleFactors {
    /// Sum of the independent contributions
    pub fn adjustment_years(&self) -> i32 {
        let gym = self.gym.map_or(0, |g| g.delta_years());
        let smoking = self.smoking.map_or(0, |s| s.delta_years());
        let cancer = if self.cancer { CANCER_PENALTY_YEARS } else { 0 };
        gym + smoking + cancer
    }

    /// Apply these factors to a base figure
    pub fn apply(&self, base: LifeExpectancyYears) -> EffectiveLifeExpectancy {
        adjust(base, self.gym, self.smoking, self.cancer)
    }
}

// ============================================================================
// Effective Life Expectancy
// ============================================================================

/// Base figure plus lifestyle adjustment, floor-clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLifeExpectancy {
    years: f64,
    floor_applied: bool,
}

impl EffectiveLifeExpectancy {
    /// Clamp a raw figure to the floor
    pub fn from_raw(raw_years: f64) -> Self {
        if raw_years < MIN_EFFECTIVE_YEARS || raw_years.is_nan() {
            Self {
                years: MIN_EFFECTIVE_YEARS,
                floor_applied: true,
            }
        } else {
            Self {
                years: raw_years,
                floor_applied: false,
            }
        }
    }

    #[inline]
    pub fn years(&self) -> f64 {
        self.years
    }

    pub fn floor_applied(&self) -> bool {
        self.floor_applied
    }

    /// Whole calendar years and the fractional remainder
    pub fn split(&self) -> (u32, f64) {
        let whole = self.years.trunc();
        (whole as u32, self.years - whole)
    }

    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.floor_applied
            .then_some(Diagnostic::LifeExpectancyFloorApplied)
    }
}

/// Apply lifestyle deltas to a base life expectancy.
///
/// Pure and infallible: a result below the floor is clamped to 0.1 years.
pub fn adjust(
    base: LifeExpectancyYears,
    gym: Option<GymTenure>,
    smoke: Option<SmokeTenure>,
    cancer: bool,
) -> EffectiveLifeExpectancy {
    let factors = LifestyleFactors {
        gym,
        smoking: smoke,
        cancer,
    };
    EffectiveLifeExpectancy::from_raw(base.value() + f64::from(factors.adjustment_years()))
}
