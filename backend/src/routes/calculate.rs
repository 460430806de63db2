//! Calculation API routes

use crate::error::ApiResult;
use crate::services::CalculatorService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use onelifetime_shared::types::{CalculateRequest, CalculationResponse};
use tracing::info;

/// Create calculation routes
pub fn calculate_routes() -> Router<AppState> {
    Router::new().route("/", post(calculate))
}

/// POST /api/v1/calculate - Project death instants and start the counters
///
/// The counters of any previous calculation are disposed before the new
/// ones start ticking.
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> ApiResult<Json<CalculationResponse>> {
    let now = Utc::now();
    let response =
        CalculatorService::calculate(state.table(), &req, now, state.calculation_settings())?;

    for diagnostic in &response.diagnostics {
        info!(
            calculation_id = %response.calculation_id,
            code = diagnostic.code(),
            "{}",
            diagnostic.message()
        );
    }

    // Counters tick against the server clock even when `as_of` pinned the values
    state
        .countdowns
        .replace(&response.calculation_id, response.counters.clone(), now);

    info!(
        calculation_id = %response.calculation_id,
        country = %response.primary.country,
        sex = %response.sex,
        seconds_remaining = response.primary.seconds_remaining,
        "Calculation complete"
    );

    Ok(Json(response))
}
