//! Common test utilities for integration tests
//!
//! Builds the router over the built-in fallback table, so no files or
//! external services are needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use onelifetime_backend::{config::AppConfig, routes, state::AppState};
use onelifetime_shared::{DigitGrouping, LifeExpectancyTable};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application on the fallback table
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(LifeExpectancyTable::fallback(), config);
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, Body::empty()).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Body::from(body.to_string())).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.send("DELETE", path, Body::empty()).await
    }

    /// Start a request and return the response without reading the body
    pub async fn open(&self, path: &str) -> axum::response::Response {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn send(&self, method: &str, path: &str, body: Body) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.countdown.comparison_count = 3;
    config.display.digit_grouping = DigitGrouping::Comma;
    config
}

/// Calculation body pinned to a fixed evaluation instant
pub fn calculate_body(country: &str, sex: &str) -> String {
    serde_json::json!({
        "birth_date": "1990-01-01",
        "birth_time": "00:00:00",
        "timezone": "UTC",
        "sex": sex,
        "country": country,
        "as_of": "2020-01-01T00:00:00Z"
    })
    .to_string()
}
