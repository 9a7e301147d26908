//! Abstraction over the blocking wait inside `admit`.
//!
//! The throttle's only suspension point is the computed wait for the oldest
//! in-window admission to expire. Hiding that wait behind a trait lets tests
//! observe the exact durations requested instead of actually waiting.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::ManualClock;

/// Performs the computed wait when the window is saturated.
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Production sleeper using the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Test sleeper that records every requested wait and, instead of sleeping,
/// advances a [`ManualClock`] by that amount.
///
/// Advancing the clock is what lets the check-wait-recheck loop in `admit`
/// make progress in tests: after the "sleep", the entry being waited on has
/// genuinely aged out of the window.
#[derive(Debug, Clone)]
pub struct RecordingSleeper {
    clock: ManualClock,
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new(clock: ManualClock) -> Self {
        Self { clock, waits: Arc::new(Mutex::new(Vec::new())) }
    }

    /// All waits requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    /// Sum of all waits requested so far.
    pub fn total_waited(&self) -> Duration {
        self.waits.lock().unwrap().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        self.waits.lock().unwrap().push(duration);
        self.clock.advance(duration);
        Box::pin(async {})
    }
}
