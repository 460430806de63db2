//! Diagnostic codes
//!
//! Clamping and fallback are policies applied silently by the core. Each one
//! leaves a code here so the caller can decide whether to surface it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// Effective life expectancy was raised to the 0.1-year floor
    LifeExpectancyFloorApplied,
    /// Projected death instant precedes now; seconds remaining pinned at 0
    PastProjection,
    /// Birth instant is after now; seconds lived pinned at 0
    FutureBirth,
    /// The built-in fallback table was used
    FallbackTable,
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::LifeExpectancyFloorApplied => "life_expectancy_floor_applied",
            Diagnostic::PastProjection => "past_projection",
            Diagnostic::FutureBirth => "future_birth",
            Diagnostic::FallbackTable => "fallback_table",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::LifeExpectancyFloorApplied => {
                "Lifestyle adjustments pushed life expectancy below 0.1 years; the floor was used"
            }
            Diagnostic::PastProjection => "Projected end of life is already in the past",
            Diagnostic::FutureBirth => "Birth instant is in the future",
            Diagnostic::FallbackTable => "Life expectancy data unavailable; using built-in figures",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
