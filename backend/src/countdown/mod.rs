//! Countdown runtime
//!
//! Drives the shared [`CountdownState`](onelifetime_shared::CountdownState)
//! on a repeating timer and fans updates out to subscribers.

pub mod board;
pub mod scheduler;

pub use board::CountdownBoard;
pub use scheduler::{Scheduler, TickCallback, TickOutcome, TimerHandle, TokioScheduler};
