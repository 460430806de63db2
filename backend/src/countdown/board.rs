//! The set of counters currently on display
//!
//! A [`CountdownBoard`] owns every live counter and the broadcast channel
//! that carries their updates. Replacing the set disposes the old counters
//! before the new ones start ticking.

use super::scheduler::{Scheduler, TickOutcome, TimerHandle};
use chrono::{DateTime, Utc};
use onelifetime_shared::countdown::TICK_INTERVAL_SECS;
use onelifetime_shared::{CountdownState, CounterSeed, CounterUpdate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

type SharedState = Arc<Mutex<CountdownState>>;

fn lock(state: &Mutex<CountdownState>) -> MutexGuard<'_, CountdownState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

struct LiveCounter {
    state: SharedState,
    timer: TimerHandle,
}

#[derive(Default)]
struct BoardSet {
    calculation_id: Option<String>,
    counters: Vec<LiveCounter>,
}

struct BoardInner {
    scheduler: Arc<dyn Scheduler>,
    period: Duration,
    updates: broadcast::Sender<CounterUpdate>,
    current: Mutex<BoardSet>,
}

/// Live counters plus their update stream. Cheap to clone.
#[derive(Clone)]
pub struct CountdownBoard {
    inner: Arc<BoardInner>,
}

impl CountdownBoard {
    /// Counters tick every [`TICK_INTERVAL_SECS`], the same interval
    /// `CountdownState::resync` measures elapsed time in.
    pub fn new(scheduler: Arc<dyn Scheduler>, buffer: usize) -> Self {
        let (updates, _) = broadcast::channel(buffer.max(1));
        Self {
            inner: Arc::new(BoardInner {
                scheduler,
                period: Duration::from_secs(u64::from(TICK_INTERVAL_SECS)),
                updates,
                current: Mutex::new(BoardSet::default()),
            }),
        }
    }

    fn current(&self) -> MutexGuard<'_, BoardSet> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn period(&self) -> Duration {
        self.inner.period
    }

    /// Receive every update published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CounterUpdate> {
        self.inner.updates.subscribe()
    }

    /// Calculation whose counters are on display
    pub fn calculation_id(&self) -> Option<String> {
        self.current().calculation_id.clone()
    }

    /// Dispose the current counters, then seed and start one per seed.
    ///
    /// Returns the seeds of the new counters in the order given.
    pub fn replace(
        &self,
        calculation_id: &str,
        seeds: Vec<CounterSeed>,
        reference_instant: DateTime<Utc>,
    ) -> Vec<CounterSeed> {
        let mut current = self.current();
        let disposed = self.dispose_set(&mut current);

        let mut counters = Vec::with_capacity(seeds.len());
        let mut started = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let mut state =
                CountdownState::seed(seed.counter_id, seed.initial_value, reference_instant);
            // A freshly seeded counter cannot be disposed yet
            let _ = state.start();
            started.push(state.seed_info());

            let state = Arc::new(Mutex::new(state));
            let timer = self.start_timer(state.clone());
            counters.push(LiveCounter { state, timer });
        }

        current.calculation_id = Some(calculation_id.to_string());
        current.counters = counters;

        info!(
            calculation_id,
            started = started.len(),
            disposed,
            "Countdown board replaced"
        );
        started
    }

    /// Dispose every counter. Returns how many were live.
    pub fn dispose_all(&self) -> usize {
        let mut current = self.current();
        let disposed = self.dispose_set(&mut current);
        current.calculation_id = None;
        if disposed > 0 {
            info!(disposed, "Countdown board cleared");
        }
        disposed
    }

    /// Current value of every live counter
    pub fn snapshot(&self) -> Vec<CounterUpdate> {
        self.current()
            .counters
            .iter()
            .map(|counter| lock(&counter.state))
            .filter(|state| !state.is_disposed())
            .map(|state| state.update())
            .collect()
    }

    /// Catch every live counter up with the wall clock
    pub fn resync(&self, now: DateTime<Utc>) -> Vec<CounterUpdate> {
        let current = self.current();
        let mut updates = Vec::with_capacity(current.counters.len());
        for counter in &current.counters {
            let mut state = lock(&counter.state);
            if state.resync(now).is_ok() {
                let update = state.update();
                let _ = self.inner.updates.send(update.clone());
                updates.push(update);
            }
        }
        updates
    }

    pub fn len(&self) -> usize {
        self.current().counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn start_timer(&self, state: SharedState) -> TimerHandle {
        let updates = self.inner.updates.clone();
        self.inner.scheduler.schedule(
            self.inner.period,
            Box::new(move || {
                let mut state = lock(&state);
                match state.tick() {
                    Ok(_) => {
                        // Published under the lock so nothing follows disposal
                        let _ = updates.send(state.update());
                        TickOutcome::Continue
                    }
                    Err(e) => {
                        debug!(error = %e, "Tick on disposed counter ignored");
                        TickOutcome::Stop
                    }
                }
            }),
        )
    }

    fn dispose_set(&self, set: &mut BoardSet) -> usize {
        let mut disposed = 0;
        for counter in set.counters.drain(..) {
            if lock(&counter.state).dispose() {
                disposed += 1;
            }
            self.inner.scheduler.cancel(counter.timer);
        }
        disposed
    }
}
