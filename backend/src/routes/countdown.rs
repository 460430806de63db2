//! Countdown API routes
//!
//! Exposes the counters started by the latest calculation: a snapshot, a
//! server-sent event stream of ticks, wall-clock resync, and teardown.

use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures::stream::{self, Stream};
use onelifetime_shared::types::{
    CountdownSnapshotResponse, CounterUpdateResponse, DisposeResponse,
};
use onelifetime_shared::{format_count, CounterUpdate, DigitGrouping};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

/// Create countdown routes
pub fn countdown_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot).delete(dispose_counters))
        .route("/stream", get(stream_ticks))
        .route("/resync", post(resync_counters))
}

fn to_response(update: CounterUpdate, grouping: DigitGrouping) -> CounterUpdateResponse {
    CounterUpdateResponse {
        display: format_count(update.value, grouping),
        counter_id: update.counter_id,
        value: update.value,
    }
}

fn snapshot_response(state: &AppState, updates: Vec<CounterUpdate>) -> CountdownSnapshotResponse {
    let grouping = state.config().display.digit_grouping;
    CountdownSnapshotResponse {
        calculation_id: state.countdowns.calculation_id(),
        counters: updates
            .into_iter()
            .map(|update| to_response(update, grouping))
            .collect(),
    }
}

/// GET /api/v1/countdown - Current value of every live counter
async fn get_snapshot(State(state): State<AppState>) -> Json<CountdownSnapshotResponse> {
    let updates = state.countdowns.snapshot();
    Json(snapshot_response(&state, updates))
}

/// POST /api/v1/countdown/resync - Catch the counters up with the wall clock
async fn resync_counters(State(state): State<AppState>) -> Json<CountdownSnapshotResponse> {
    let updates = state.countdowns.resync(Utc::now());
    debug!(counters = updates.len(), "Counters resynced");
    Json(snapshot_response(&state, updates))
}

/// DELETE /api/v1/countdown - Dispose every counter
async fn dispose_counters(State(state): State<AppState>) -> Json<DisposeResponse> {
    let disposed = state.countdowns.dispose_all();
    info!(disposed, "Counters disposed on request");
    Json(DisposeResponse { disposed })
}

/// GET /api/v1/countdown/stream - `tick` events for every counter update
async fn stream_ticks(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let grouping = state.config().display.digit_grouping;
    let rx = state.countdowns.subscribe();

    let ticks = stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(update) => return Some((Ok(tick_event(update, grouping)), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Tick subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(ticks).keep_alive(KeepAlive::default())
}

fn tick_event(update: CounterUpdate, grouping: DigitGrouping) -> Event {
    let value = update.value;
    let payload = to_response(update, grouping);
    Event::default()
        .event("tick")
        .json_data(&payload)
        .unwrap_or_else(|_| Event::default().event("tick").data(value.to_string()))
}
