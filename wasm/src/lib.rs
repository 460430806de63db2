//! OneLifeTime WASM Module
//!
//! WebAssembly bindings so the browser can adjust, project, and tick
//! counters locally with the same arithmetic as the backend.

use chrono::{DateTime, Utc};
use onelifetime_shared::validation::validate_life_expectancy;
use onelifetime_shared::{
    adjust, format_count as format_grouped, project, BirthInstant, CountdownState, CounterId,
    DigitGrouping, EffectiveLifeExpectancy, GymTenure, LifeExpectancyYears, SmokeTenure,
};
use wasm_bindgen::prelude::*;

/// Empty or "none" means the factor does not apply
fn parse_category<T>(code: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    match code.trim() {
        "" | "none" => Ok(None),
        other => other.parse().map(Some),
    }
}

fn adjust_years(base: f64, gym: &str, smoking: &str, cancer: bool) -> Result<f64, String> {
    let base = LifeExpectancyYears::new(base).map_err(|e| e.to_string())?;
    let gym = parse_category::<GymTenure>(gym)?;
    let smoking = parse_category::<SmokeTenure>(smoking)?;
    Ok(adjust(base, gym, smoking, cancer).years())
}

fn instant_from_millis(epoch_ms: f64) -> Result<DateTime<Utc>, String> {
    if !epoch_ms.is_finite() {
        return Err("Timestamp must be a finite number".to_string());
    }
    DateTime::<Utc>::from_timestamp_millis(epoch_ms.floor() as i64)
        .ok_or_else(|| format!("Timestamp out of range: {}", epoch_ms))
}

fn seconds_remaining(birth_epoch_ms: f64, effective_years: f64, now_epoch_ms: f64) -> Result<u64, String> {
    validate_life_expectancy(effective_years)?;
    let birth = BirthInstant::from_utc(instant_from_millis(birth_epoch_ms)?)
        .map_err(|e| e.to_string())?;
    let now = instant_from_millis(now_epoch_ms)?;
    let effective = EffectiveLifeExpectancy::from_raw(effective_years);
    Ok(project(&birth, effective, &now).seconds_remaining)
}

/// Effective life expectancy for string category codes
/// (e.g. `"one_to_three_years"`, `"more_than_ten_years"`, or `""`)
#[wasm_bindgen]
pub fn adjust_life_expectancy(
    base: f64,
    gym: &str,
    smoking: &str,
    cancer: bool,
) -> Result<f64, JsValue> {
    adjust_years(base, gym, smoking, cancer).map_err(|e| JsValue::from_str(&e))
}

/// Seconds remaining for a UTC birth instant, both instants in epoch millis
#[wasm_bindgen]
pub fn project_seconds_remaining(
    birth_epoch_ms: f64,
    effective_years: f64,
    now_epoch_ms: f64,
) -> Result<f64, JsValue> {
    seconds_remaining(birth_epoch_ms, effective_years, now_epoch_ms)
        .map(|s| s as f64)
        .map_err(|e| JsValue::from_str(&e))
}

/// Group digits for display; `grouping` is e.g. `"fr-FR"`, `"comma"`, `"none"`
#[wasm_bindgen]
pub fn format_count(value: f64, grouping: &str) -> String {
    let grouping = grouping.parse::<DigitGrouping>().unwrap_or_default();
    let value = if value.is_finite() { value.max(0.0) as u64 } else { 0 };
    format_grouped(value, grouping)
}

/// One counter driven by a browser timer
#[wasm_bindgen]
pub struct Countdown {
    state: CountdownState,
}

#[wasm_bindgen]
impl Countdown {
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str, initial: f64) -> Countdown {
        let initial = if initial.is_finite() { initial.max(0.0) as u64 } else { 0 };
        let mut state = CountdownState::seed(CounterId::new(id), initial, Utc::now());
        // A freshly seeded counter cannot be disposed yet
        let _ = state.start();
        Countdown { state }
    }

    /// Decrement by one; `undefined` once disposed
    pub fn tick(&mut self) -> Option<f64> {
        self.state.tick().ok().map(|v| v as f64)
    }

    pub fn value(&self) -> f64 {
        self.state.current_value() as f64
    }

    pub fn id(&self) -> String {
        self.state.id().to_string()
    }

    pub fn dispose(&mut self) {
        self.state.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }
}
