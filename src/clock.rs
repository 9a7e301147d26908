//! Clock abstraction used by the throttle's admission history.
//!
//! History entries are stored as offsets from the clock's origin rather than
//! raw `Instant`s, so a test clock can be advanced by hand.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source of the current time, as elapsed duration since the clock's origin.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Duration;
}

/// Production clock backed by `tokio::time::Instant`.
///
/// Under `tokio::time::pause()` this follows the runtime's virtual clock, so
/// `start_paused` tests observe exact waits with no real delays.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self { origin: tokio::time::Instant::now() }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Test clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap();
        *elapsed += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }
}
