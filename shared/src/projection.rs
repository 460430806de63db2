//! Death-instant projection
//!
//! Converts an effective life expectancy and a birth instant into a projected
//! death instant plus whole-second counters relative to `now`.
//!
//! The projection is a two-step rule:
//!
//! 1. Add the whole years with calendar arithmetic in the birth timezone
//!    (anniversary-aligned; Feb 29 rolls back to Feb 28).
//! 2. Add the fractional remainder as a flat elapsed duration using an
//!    average year of 365.25 days.

use crate::diagnostics::Diagnostic;
use crate::errors::CalculationError;
use crate::lifestyle::EffectiveLifeExpectancy;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Average year length used for the fractional remainder
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Earliest accepted birth year
pub const MIN_BIRTH_YEAR: i32 = 1000;
/// Latest accepted birth year
pub const MAX_BIRTH_YEAR: i32 = 9000;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

// ============================================================================
// Birth Instant
// ============================================================================

/// A civil birth date-time resolved to one absolute instant
#[derive(Debug, Clone, PartialEq)]
pub struct BirthInstant {
    local: NaiveDateTime,
    timezone: Tz,
    instant: DateTime<Tz>,
}

impl BirthInstant {
    /// Resolve a date, time and IANA timezone name
    pub fn resolve(
        date: NaiveDate,
        time: NaiveTime,
        timezone: &str,
    ) -> Result<Self, CalculationError> {
        let tz = parse_timezone(timezone)?;
        Self::from_local(date.and_time(time), tz)
    }

    /// Resolve a civil date-time in `timezone`.
    ///
    /// Wall times repeated or skipped by a DST transition are rejected; the
    /// birth instant must be unambiguous.
    pub fn from_local(local: NaiveDateTime, timezone: Tz) -> Result<Self, CalculationError> {
        if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&local.year()) {
            return Err(CalculationError::BirthOutOfRange(local.year()));
        }

        match timezone.from_local_datetime(&local) {
            LocalResult::Single(instant) => Ok(Self {
                local,
                timezone,
                instant,
            }),
            LocalResult::Ambiguous(_, _) => Err(CalculationError::AmbiguousLocalTime {
                local: local.to_string(),
                timezone: timezone.name().to_string(),
            }),
            LocalResult::None => Err(CalculationError::NonexistentLocalTime {
                local: local.to_string(),
                timezone: timezone.name().to_string(),
            }),
        }
    }

    /// A birth instant expressed in UTC
    pub fn from_utc(instant: DateTime<Utc>) -> Result<Self, CalculationError> {
        Self::from_local(instant.naive_utc(), chrono_tz::UTC)
    }

    /// Absolute instant
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }

    /// Civil date-time as entered
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn zoned(&self) -> DateTime<Tz> {
        self.instant
    }
}

/// Parse an IANA timezone identifier
pub fn parse_timezone(name: &str) -> Result<Tz, CalculationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalculationError::InvalidTimezone(name.to_string()))
}

// ============================================================================
// Calendar and flat arithmetic
// ============================================================================

/// Add whole calendar years to the birth instant in its own timezone.
///
/// Day-of-month overflow clamps to the end of the month. If the shifted wall
/// time is repeated by a DST transition the earlier instant is used; if it
/// was skipped, it is read with the offset in force just before the gap.
pub fn calendar_add_years(birth: &BirthInstant, years: u32) -> DateTime<Utc> {
    let tz = birth.timezone;
    let shifted = birth
        .local
        .checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDateTime::MAX);

    let zoned = match tz.from_local_datetime(&shifted) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = tz
                .offset_from_utc_datetime(&(shifted - Duration::days(1)))
                .fix();
            tz.from_utc_datetime(&(shifted - Duration::seconds(i64::from(before.local_minus_utc()))))
        }
    };

    zoned.with_timezone(&Utc)
}

/// Flat duration for a fractional year, at microsecond resolution.
/// Half-microsecond ties round to even.
pub fn fractional_year_duration(fraction: f64) -> Duration {
    Duration::microseconds((fraction * DAYS_PER_YEAR * MICROS_PER_DAY).round_ties_even() as i64)
}

/// Whole seconds from `from` to `to`, rounded toward negative infinity
pub fn floor_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let delta = to - from;
    let secs = delta.num_seconds();
    if Duration::seconds(secs) > delta {
        secs - 1
    } else {
        secs
    }
}

/// Projected death instant for a birth and effective life expectancy
pub fn death_instant(birth: &BirthInstant, effective: EffectiveLifeExpectancy) -> DateTime<Utc> {
    let (whole_years, fraction) = effective.split();
    calendar_add_years(birth, whole_years) + fractional_year_duration(fraction)
}

// ============================================================================
// Projection
// ============================================================================

/// Result of one projection
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub birth_instant: DateTime<Utc>,
    pub death_instant: DateTime<Utc>,
    /// Death instant in the birth timezone
    pub death_local: DateTime<Tz>,
    pub effective_years: f64,
    /// Whole seconds since birth, never negative
    pub seconds_lived: u64,
    /// Whole seconds until the death instant, never negative
    pub seconds_remaining: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Project the death instant and the lived/remaining counters.
///
/// `now` may be given in any timezone; only its absolute instant matters.
/// Both counters clamp at zero: a future birth yields `seconds_lived = 0`
/// and a past death yields `seconds_remaining = 0`.
pub fn project<Z: TimeZone>(
    birth: &BirthInstant,
    effective: EffectiveLifeExpectancy,
    now: &DateTime<Z>,
) -> Projection {
    let now = now.with_timezone(&Utc);
    let birth_instant = birth.instant();
    let death = death_instant(birth, effective);

    let mut diagnostics = Vec::new();
    if let Some(d) = effective.diagnostic() {
        diagnostics.push(d);
    }

    let lived = floor_seconds_between(birth_instant, now);
    if lived < 0 {
        diagnostics.push(Diagnostic::FutureBirth);
    }

    let remaining = floor_seconds_between(now, death);
    if remaining < 0 {
        diagnostics.push(Diagnostic::PastProjection);
    }

    Projection {
        birth_instant,
        death_instant: death,
        death_local: death.with_timezone(&birth.timezone),
        effective_years: effective.years(),
        seconds_lived: lived.max(0) as u64,
        seconds_remaining: remaining.max(0) as u64,
        diagnostics,
    }
}
