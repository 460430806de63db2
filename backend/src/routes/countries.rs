//! Life-expectancy table API routes

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use onelifetime_shared::types::{
    CountriesResponse, CountryResponse, RankedCountry, RankingsQuery, RankingsResponse,
};
use onelifetime_shared::validation::{validate_comparison_count, ValidationError};
use onelifetime_shared::{BiologicalSex, LifeExpectancyTable, RankOrder};

/// Create table routes
pub fn countries_routes() -> Router<AppState> {
    Router::new().route("/", get(list_countries))
}

pub fn rankings_routes() -> Router<AppState> {
    Router::new().route("/", get(get_rankings))
}

/// GET /api/v1/countries - List the loaded table
async fn list_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    let table = state.table();
    let countries: Vec<CountryResponse> = table
        .entries()
        .iter()
        .map(|entry| CountryResponse {
            country: entry.country.clone(),
            male: entry.male.value(),
            female: entry.female.value(),
        })
        .collect();

    Json(CountriesResponse {
        source: table.source().clone(),
        count: countries.len(),
        countries,
    })
}

/// GET /api/v1/rankings?sex=&count= - Highest and lowest countries for a sex
async fn get_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> ApiResult<Json<RankingsResponse>> {
    let count = query
        .count
        .unwrap_or(state.config().countdown.comparison_count);
    validate_comparison_count(count).map_err(|m| ValidationError::new("count", &m))?;

    Ok(Json(RankingsResponse {
        sex: query.sex,
        top: ranked(state.table(), query.sex, RankOrder::Top, count),
        bottom: ranked(state.table(), query.sex, RankOrder::Bottom, count),
    }))
}

fn ranked(
    table: &LifeExpectancyTable,
    sex: BiologicalSex,
    order: RankOrder,
    count: usize,
) -> Vec<RankedCountry> {
    table
        .ranked(sex, order, count)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedCountry {
            rank: i + 1,
            country: entry.country.clone(),
            life_expectancy: entry.for_sex(sex).value(),
        })
        .collect()
}
