//! Repeating timer abstraction
//!
//! [`Scheduler`] decouples counter logic from the clock that drives it.
//! [`TokioScheduler`] runs each schedule as its own task on a
//! `tokio::time::interval`; cancelling aborts the task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// What a callback wants after it has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

pub type TickCallback = Box<dyn FnMut() -> TickOutcome + Send + 'static>;

/// Identifies one schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Scheduler: Send + Sync {
    /// Invoke `callback` every `period`, first after one full period
    fn schedule(&self, period: Duration, callback: TickCallback) -> TimerHandle;

    /// Stop a schedule. Returns `false` if it was unknown or already finished.
    fn cancel(&self, handle: TimerHandle) -> bool;

    /// Number of schedules still running
    fn active(&self) -> usize;
}

/// Scheduler backed by tokio tasks
#[derive(Default)]
pub struct TokioScheduler {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TimerHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, mut callback: TickCallback) -> TimerHandle {
        let handle = TimerHandle(self.next_id.fetch_add(1, Ordering::Relaxed));

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if callback() == TickOutcome::Stop {
                    break;
                }
            }
        });

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|_, task| !task.is_finished());
        tasks.insert(handle, task);
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);

        match task {
            Some(task) => {
                let was_running = !task.is_finished();
                task.abort();
                debug!(timer = handle.id(), "Timer cancelled");
                was_running
            }
            None => false,
        }
    }

    fn active(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }
}
