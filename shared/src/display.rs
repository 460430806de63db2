//! Display formatting for countdown values and instants
//!
//! The core only produces raw non-negative integers. This module is the
//! presentation layer that groups digits for humans.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Narrow no-break space, the French thousands separator
pub const NARROW_NBSP: char = '\u{202F}';

/// Civil date-time format used for projected instants
pub const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Digit grouping
// ============================================================================

/// Thousands separator style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// 1234567
    None,
    /// 1,234,567
    Comma,
    /// 1 234 567 (narrow no-break space)
    #[default]
    Space,
    /// 1.234.567
    Period,
}

impl DigitGrouping {
    pub fn separator(&self) -> Option<char> {
        match self {
            DigitGrouping::None => None,
            DigitGrouping::Comma => Some(','),
            DigitGrouping::Space => Some(NARROW_NBSP),
            DigitGrouping::Period => Some('.'),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DigitGrouping::None => "none",
            DigitGrouping::Comma => "comma",
            DigitGrouping::Space => "space",
            DigitGrouping::Period => "period",
        }
    }
}

impl fmt::Display for DigitGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DigitGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "plain" => Ok(DigitGrouping::None),
            "comma" | "en" | "en-us" => Ok(DigitGrouping::Comma),
            "space" | "fr" | "fr-fr" => Ok(DigitGrouping::Space),
            "period" | "dot" | "de" | "de-de" => Ok(DigitGrouping::Period),
            _ => Err(format!("Unknown digit grouping: {}", s)),
        }
    }
}

/// Format a count with grouped digits
pub fn format_count(value: u64, grouping: DigitGrouping) -> String {
    let digits = value.to_string();
    let Some(separator) = grouping.separator() else {
        return digits;
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Format an instant as civil time in its own timezone
pub fn format_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    instant.format(INSTANT_FORMAT).to_string()
}
