//! Health check endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness probe (reports the loaded table)
//! - /health/live - Liveness probe (always returns OK if server is running)

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use onelifetime_shared::TableSource;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub table: TableCheck,
    pub countdown: CountdownCheck,
}

/// Loaded life-expectancy table
#[derive(Serialize)]
pub struct TableCheck {
    pub status: String,
    pub source: TableSource,
    pub countries: usize,
}

/// Counters on display
#[derive(Serialize)]
pub struct CountdownCheck {
    pub live_counters: usize,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Readiness probe - ready once a non-empty table is loaded
/// Returns 503 if the table is empty
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let table = state.table();
    let is_healthy = !table.is_empty();

    let table_check = TableCheck {
        status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
        source: table.source().clone(),
        countries: table.len(),
    };

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks {
            table: table_check,
            countdown: CountdownCheck {
                live_counters: state.countdowns.len(),
            },
        }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use onelifetime_shared::LifeExpectancyTable;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[tokio::test]
    async fn test_readiness_reports_fallback_table() {
        let state = AppState::new(LifeExpectancyTable::fallback(), AppConfig::default());
        let Ok(Json(response)) = readiness_check(State(state)).await else {
            panic!("fallback table should be ready");
        };

        assert_eq!(response.status, "ready");
        let checks = response.checks.unwrap();
        assert!(checks.table.source.is_fallback());
        assert_eq!(checks.table.countries, 5);
        assert_eq!(checks.countdown.live_counters, 0);
    }
}
