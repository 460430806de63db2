//! Countdown state
//!
//! One displayed counter, seeded from a calculation and decremented once per
//! tick. The state machine is:
//!
//! ```text
//! Seeded --start/tick--> Running --value hits 0--> Zeroed
//!    \                      |                         |
//!     `---------------------+--------dispose----------+--> Disposed
//! ```
//!
//! Scheduling lives elsewhere; this type only holds the value and enforces
//! the transitions.

use crate::errors::CountdownError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds between ticks
pub const TICK_INTERVAL_SECS: u32 = 1;

/// Identity of one displayed counter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterId(String);

impl CounterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Counter id namespaced by the calculation that created it
    pub fn scoped(calculation_id: &str, slot: &str) -> Self {
        Self(format!("{}:{}", calculation_id, slot))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Initial value handed to the display surface when a counter is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSeed {
    pub counter_id: CounterId,
    pub initial_value: u64,
}

/// New value published on each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterUpdate {
    pub counter_id: CounterId,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    /// Created, not yet ticking
    Seeded,
    /// Ticking, value above zero
    Running,
    /// Ticking, value pinned at zero
    Zeroed,
    /// Terminal; no further ticks are accepted
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    id: CounterId,
    seed_value: u64,
    current_value: u64,
    reference_instant: DateTime<Utc>,
    tick_interval_secs: u32,
    phase: CountdownPhase,
    ticks: u64,
}

impl CountdownState {
    /// Seed a counter with the seconds remaining at `reference_instant`
    pub fn seed(id: CounterId, seconds_remaining: u64, reference_instant: DateTime<Utc>) -> Self {
        Self {
            id,
            seed_value: seconds_remaining,
            current_value: seconds_remaining,
            reference_instant,
            tick_interval_secs: TICK_INTERVAL_SECS,
            phase: CountdownPhase::Seeded,
            ticks: 0,
        }
    }

    pub fn id(&self) -> &CounterId {
        &self.id
    }

    pub fn current_value(&self) -> u64 {
        self.current_value
    }

    pub fn reference_instant(&self) -> DateTime<Utc> {
        self.reference_instant
    }

    pub fn tick_interval_secs(&self) -> u32 {
        self.tick_interval_secs
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Number of ticks applied since seeding
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == CountdownPhase::Disposed
    }

    /// Move from `Seeded` to `Running` (or straight to `Zeroed`)
    pub fn start(&mut self) -> Result<CountdownPhase, CountdownError> {
        match self.phase {
            CountdownPhase::Disposed => Err(CountdownError::Disposed(self.id.to_string())),
            CountdownPhase::Seeded => {
                self.phase = self.live_phase();
                Ok(self.phase)
            }
            phase => Ok(phase),
        }
    }

    /// Decrement by one, pinned at zero. Fails once disposed.
    pub fn tick(&mut self) -> Result<u64, CountdownError> {
        self.start()?;
        self.current_value = self.current_value.saturating_sub(1);
        self.ticks += 1;
        self.phase = self.live_phase();
        Ok(self.current_value)
    }

    /// Mark the counter disposed. Returns `false` if it already was.
    pub fn dispose(&mut self) -> bool {
        let was_live = !self.is_disposed();
        self.phase = CountdownPhase::Disposed;
        was_live
    }

    /// Value implied by wall-clock time elapsed since the reference instant
    pub fn expected_value_at(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = (now - self.reference_instant).num_seconds().max(0) as u64;
        let ticks = elapsed / u64::from(self.tick_interval_secs.max(1));
        self.seed_value.saturating_sub(ticks)
    }

    /// Pull the value down to what the wall clock implies.
    ///
    /// Missed ticks are caught up; the value never moves upward.
    pub fn resync(&mut self, now: DateTime<Utc>) -> Result<u64, CountdownError> {
        self.start()?;
        let expected = self.expected_value_at(now);
        if expected < self.current_value {
            self.ticks += self.current_value - expected;
            self.current_value = expected;
        }
        self.phase = self.live_phase();
        Ok(self.current_value)
    }

    pub fn seed_info(&self) -> CounterSeed {
        CounterSeed {
            counter_id: self.id.clone(),
            initial_value: self.seed_value,
        }
    }

    pub fn update(&self) -> CounterUpdate {
        CounterUpdate {
            counter_id: self.id.clone(),
            value: self.current_value,
        }
    }

    fn live_phase(&self) -> CountdownPhase {
        if self.current_value == 0 {
            CountdownPhase::Zeroed
        } else {
            CountdownPhase::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn counter(value: u64) -> CountdownState {
        CountdownState::seed(CounterId::new("primary"), value, reference())
    }

    #[test]
    fn test_seeded_then_running() {
        let mut state = counter(10);
        assert_eq!(state.phase(), CountdownPhase::Seeded);
        assert_eq!(state.start().unwrap(), CountdownPhase::Running);
        assert_eq!(state.tick().unwrap(), 9);
        assert_eq!(state.ticks(), 1);
    }

    #[test]
    fn test_first_tick_starts_counter() {
        let mut state = counter(3);
        assert_eq!(state.tick().unwrap(), 2);
        assert_eq!(state.phase(), CountdownPhase::Running);
    }

    #[test]
    fn test_zeroed_stays_at_zero() {
        let mut state = counter(2);
        state.tick().unwrap();
        state.tick().unwrap();
        assert_eq!(state.phase(), CountdownPhase::Zeroed);

        for _ in 0..10 {
            assert_eq!(state.tick().unwrap(), 0);
        }
        assert_eq!(state.phase(), CountdownPhase::Zeroed);
    }

    #[test]
    fn test_zero_seed_starts_zeroed() {
        let mut state = counter(0);
        assert_eq!(state.start().unwrap(), CountdownPhase::Zeroed);
        assert_eq!(state.tick().unwrap(), 0);
    }

    #[test]
    fn test_disposed_counter_refuses_ticks() {
        let mut state = counter(100);
        state.tick().unwrap();
        assert!(state.dispose());
        assert!(!state.dispose());

        assert_eq!(
            state.tick(),
            Err(CountdownError::Disposed("primary".to_string()))
        );
        assert!(state.start().is_err());
        assert_eq!(state.current_value(), 99);
    }

    #[test]
    fn test_resync_catches_up_missed_ticks() {
        let mut state = counter(100);
        state.tick().unwrap();

        let value = state.resync(reference() + Duration::milliseconds(10_500)).unwrap();
        assert_eq!(value, 90);
        assert_eq!(state.ticks(), 10);
    }

    #[test]
    fn test_resync_never_increases() {
        let mut state = counter(100);
        for _ in 0..5 {
            state.tick().unwrap();
        }
        // wall clock says only 2 seconds elapsed
        let value = state.resync(reference() + Duration::seconds(2)).unwrap();
        assert_eq!(value, 95);
    }

    #[test]
    fn test_scoped_counter_ids_differ_per_calculation() {
        let a = CounterId::scoped("calc-a", "primary");
        let b = CounterId::scoped("calc-b", "primary");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "calc-a:primary");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: after n ticks from v, value = max(0, v - n)
        #[test]
        fn prop_value_after_n_ticks(v in 0u64..5_000, n in 0u64..10_000) {
            let mut state = counter(v);
            for _ in 0..n {
                state.tick().unwrap();
            }
            prop_assert_eq!(state.current_value(), v.saturating_sub(n));
        }

        /// Property: counters never share state
        #[test]
        fn prop_counters_independent(a in 1u64..1_000, b in 1u64..1_000, n in 0u64..500) {
            let mut first = counter(a);
            let second = CountdownState::seed(CounterId::new("top-1"), b, reference());
            for _ in 0..n {
                first.tick().unwrap();
            }
            prop_assert_eq!(second.current_value(), b);
            prop_assert_eq!(second.phase(), CountdownPhase::Seeded);
        }

        /// Property: expected value matches ticking once per elapsed second
        #[test]
        fn prop_expected_value_matches_ticks(v in 0u64..10_000, elapsed in 0i64..20_000) {
            let state = counter(v);
            let now = reference() + Duration::seconds(elapsed);
            prop_assert_eq!(state.expected_value_at(now), v.saturating_sub(elapsed as u64));
        }
    }
}
