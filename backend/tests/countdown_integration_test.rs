//! Integration tests for the countdown endpoints

mod common;

use axum::http::StatusCode;
use common::{calculate_body, TestApp};
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;

async fn calculate(app: &TestApp, country: &str) -> Value {
    let (status, body) = app
        .post("/api/v1/calculate", &calculate_body(country, "female"))
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_snapshot_empty_before_calculation() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/countdown").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["calculation_id"].is_null());
    assert!(json["counters"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calculation_starts_counters() {
    let app = TestApp::new();
    let calculation = calculate(&app, "Japan").await;

    let (status, body) = app.get("/api/v1/countdown").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["calculation_id"], calculation["calculation_id"]);

    let counters = json["counters"].as_array().unwrap();
    assert_eq!(counters.len(), 7);
    assert_eq!(counters[0]["counter_id"], calculation["primary"]["counter_id"]);

    let seed = calculation["primary"]["seconds_remaining"].as_u64().unwrap();
    let value = counters[0]["value"].as_u64().unwrap();
    assert!(value <= seed && seed - value <= 1);
    assert!(counters[0]["display"].as_str().unwrap().contains(','));
}

#[tokio::test]
async fn test_new_calculation_replaces_counters() {
    let app = TestApp::new();
    let first = calculate(&app, "Japan").await;
    let second = calculate(&app, "Nigeria").await;

    let (_, body) = app.get("/api/v1/countdown").await;
    let json: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["calculation_id"], second["calculation_id"]);
    let first_id = first["calculation_id"].as_str().unwrap();
    for counter in json["counters"].as_array().unwrap() {
        assert!(!counter["counter_id"].as_str().unwrap().starts_with(first_id));
    }
    assert_eq!(app.state.countdowns.len(), 7);
}

#[tokio::test]
async fn test_delete_disposes_counters() {
    let app = TestApp::new();
    calculate(&app, "Japan").await;

    let (status, body) = app.delete("/api/v1/countdown").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["disposed"], 7);

    let (_, body) = app.get("/api/v1/countdown").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["counters"].as_array().unwrap().is_empty());

    let (_, body) = app.delete("/api/v1/countdown").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["disposed"], 0);
}

#[tokio::test]
async fn test_resync_keeps_counters_at_or_below_seed() {
    let app = TestApp::new();
    let calculation = calculate(&app, "Japan").await;
    let seed = calculation["primary"]["seconds_remaining"].as_u64().unwrap();

    let (status, body) = app.post("/api/v1/countdown/resync", "").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let counters = json["counters"].as_array().unwrap();
    assert_eq!(counters.len(), 7);
    assert!(counters[0]["value"].as_u64().unwrap() <= seed);
}

#[tokio::test]
async fn test_stream_emits_tick_events() {
    let app = TestApp::new();

    let response = app.open("/api/v1/countdown/stream").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let calculation = calculate(&app, "Japan").await;
    let calculation_id = calculation["calculation_id"].as_str().unwrap();

    let mut frames = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no tick within 5s")
        .expect("stream ended")
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    assert!(text.contains("event: tick"), "frame: {}", text);
    assert!(text.contains(calculation_id), "frame: {}", text);
}
