//! Calculation service
//!
//! Provides business logic for:
//! - Resolving the birth instant in its IANA timezone
//! - Adjusting the country figure for lifestyle factors
//! - Projecting the person's row and the top/bottom comparison rows
//! - Seeding one counter per row

use crate::error::ApiResult;
use chrono::{DateTime, Utc};
use onelifetime_shared::types::{CalculateRequest, CalculationResponse, ProjectionRow};
use onelifetime_shared::validation::{
    validate_birth_date, validate_comparison_count, validate_country, validate_timezone,
    ValidationError,
};
use onelifetime_shared::{
    format_count, format_instant, project, BirthInstant, CounterId, CounterSeed, Diagnostic,
    DigitGrouping, LifeExpectancyTable, LifeExpectancyYears, LifestyleFactors, RankOrder,
};
use uuid::Uuid;

/// Slot of the requester's own counter
pub const PRIMARY_SLOT: &str = "primary";

/// Per-deployment calculation settings
#[derive(Debug, Clone, Copy)]
pub struct CalculationSettings {
    /// Countries in each of the top and bottom rankings
    pub comparison_count: usize,
    pub grouping: DigitGrouping,
}

/// Everything a row needs besides its country
struct RowContext<'a> {
    calculation_id: &'a str,
    birth: &'a BirthInstant,
    lifestyle: LifestyleFactors,
    now: DateTime<Utc>,
    grouping: DigitGrouping,
}

impl RowContext<'_> {
    fn row(
        &self,
        slot: &str,
        country: &str,
        rank: Option<usize>,
        base: LifeExpectancyYears,
    ) -> ProjectionRow {
        let effective = self.lifestyle.apply(base);
        let projection = project(self.birth, effective, &self.now);

        ProjectionRow {
            counter_id: CounterId::scoped(self.calculation_id, slot),
            country: country.to_string(),
            rank,
            base_years: base.value(),
            effective_years: projection.effective_years,
            death_instant: projection.death_instant,
            death_local: format_instant(&projection.death_local),
            seconds_lived: projection.seconds_lived,
            seconds_remaining: projection.seconds_remaining,
            seconds_remaining_display: format_count(projection.seconds_remaining, self.grouping),
            diagnostics: projection.diagnostics,
        }
    }

    fn ranking(
        &self,
        table: &LifeExpectancyTable,
        request: &CalculateRequest,
        order: RankOrder,
        count: usize,
    ) -> Vec<ProjectionRow> {
        let prefix = match order {
            RankOrder::Top => "top",
            RankOrder::Bottom => "bottom",
        };

        table
            .ranked(request.sex, order, count)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let rank = i + 1;
                self.row(
                    &format!("{}-{}", prefix, rank),
                    &entry.country,
                    Some(rank),
                    entry.for_sex(request.sex),
                )
            })
            .collect()
    }
}

/// Calculation service
pub struct CalculatorService;

impl CalculatorService {
    /// Run one calculation.
    ///
    /// `now` is the server clock; the request's `as_of` takes precedence when
    /// present. Every returned row carries a counter id scoped to a fresh
    /// calculation id.
    pub fn calculate(
        table: &LifeExpectancyTable,
        request: &CalculateRequest,
        now: DateTime<Utc>,
        settings: CalculationSettings,
    ) -> ApiResult<CalculationResponse> {
        validate_country(&request.country).map_err(|m| ValidationError::new("country", &m))?;
        validate_birth_date(request.birth_date)
            .map_err(|m| ValidationError::new("birth_date", &m))?;
        validate_timezone(&request.timezone).map_err(|m| ValidationError::new("timezone", &m))?;
        validate_comparison_count(settings.comparison_count)
            .map_err(|m| ValidationError::new("count", &m))?;

        let birth = BirthInstant::resolve(request.birth_date, request.birth_time, &request.timezone)?;
        let base = table.lookup(&request.country, request.sex)?;
        let country = table
            .find(&request.country)
            .map(|entry| entry.country.clone())
            .unwrap_or_else(|| request.country.trim().to_string());

        let lifestyle = request.lifestyle();
        let now = request.as_of.unwrap_or(now);
        let calculation_id = Uuid::new_v4().to_string();

        let ctx = RowContext {
            calculation_id: &calculation_id,
            birth: &birth,
            lifestyle,
            now,
            grouping: settings.grouping,
        };

        let primary = ctx.row(PRIMARY_SLOT, &country, None, base);
        let top = ctx.ranking(table, request, RankOrder::Top, settings.comparison_count);
        let bottom = ctx.ranking(table, request, RankOrder::Bottom, settings.comparison_count);

        let counters: Vec<CounterSeed> = std::iter::once(&primary)
            .chain(top.iter())
            .chain(bottom.iter())
            .map(|row| CounterSeed {
                counter_id: row.counter_id.clone(),
                initial_value: row.seconds_remaining,
            })
            .collect();

        let mut diagnostics = primary.diagnostics.clone();
        if table.source().is_fallback() {
            diagnostics.push(Diagnostic::FallbackTable);
        }

        Ok(CalculationResponse {
            calculation_id,
            calculated_at: now,
            birth_instant: birth.instant(),
            timezone: birth.timezone().name().to_string(),
            sex: request.sex,
            adjustment_years: lifestyle.adjustment_years(),
            primary,
            top,
            bottom,
            table_source: table.source().clone(),
            counters,
            diagnostics,
        })
    }
}
