//! Sliding-window admission throttle.
//!
//! A [`Throttle`] tracks the timestamps of recently granted admissions and
//! suspends callers of [`Throttle::admit`] until admitting one more request
//! would keep the count inside the rolling window at or under the limit.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::{Clock, TokioClock};
use crate::sleeper::{Sleeper, TokioSleeper};

/// Default window length when none is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct State {
    /// Max admissions per window. `None` disables limiting entirely.
    limit: Option<usize>,
    window: Duration,
    /// Clock offsets of granted admissions, oldest first.
    history: VecDeque<Duration>,
    /// Diagnostic count of every admission ever granted.
    total_admitted: u64,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

/// Client-side request throttle enforcing at most `limit` admissions per
/// rolling `window`.
///
/// Clones share one admission history, so a single `Throttle` can gate many
/// call sites. All state lives behind one mutex; the mutex is released while
/// a caller waits, so callers that still have a free slot are never stuck
/// behind a sleeping one.
///
/// ```rust
/// use pacer::Throttle;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let throttle = Throttle::new(12, Duration::from_secs(60));
///     throttle.admit().await;
///     // perform the transport call here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Throttle {
    shared: Arc<Shared>,
}

impl Default for Throttle {
    /// A throttle with limiting disabled and the default 60 s window.
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Throttle {
    /// Create a throttle admitting at most `limit` requests per `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self::with_parts(
            Some(limit),
            window,
            Arc::new(TokioClock::default()),
            Arc::new(TokioSleeper),
        )
    }

    /// Create a throttle with limiting disabled; every `admit` returns
    /// immediately.
    pub fn unlimited() -> Self {
        Self::with_parts(
            None,
            DEFAULT_WINDOW,
            Arc::new(TokioClock::default()),
            Arc::new(TokioSleeper),
        )
    }

    /// Create a throttle with an explicit clock and sleeper, for tests or
    /// non-tokio timer sources.
    pub fn with_parts(
        limit: Option<usize>,
        window: Duration,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let state = State { limit, window, history: VecDeque::new(), total_admitted: 0 };
        Self { shared: Arc::new(Shared { state: Mutex::new(state), clock, sleeper }) }
    }

    /// Current admission limit, `None` when limiting is disabled.
    pub fn limit(&self) -> Option<usize> {
        self.shared.state.lock().unwrap().limit
    }

    /// Change the admission limit. Takes effect on the next `admit`
    /// evaluation; prior history is kept and re-judged against the new value.
    pub fn set_limit(&self, limit: Option<usize>) {
        self.shared.state.lock().unwrap().limit = limit;
    }

    /// Current window length.
    pub fn window(&self) -> Duration {
        self.shared.state.lock().unwrap().window
    }

    /// Change the window length. Takes effect on the next `admit` evaluation.
    pub fn set_window(&self, window: Duration) {
        self.shared.state.lock().unwrap().window = window;
    }

    /// Total admissions granted since creation. Diagnostic only.
    pub fn total_admitted(&self) -> u64 {
        self.shared.state.lock().unwrap().total_admitted
    }

    /// Wait until one more request may legally proceed, then record it.
    ///
    /// Returns immediately when limiting is disabled or the window has a free
    /// slot. Otherwise sleeps exactly until the oldest in-window admission
    /// expires and re-checks, because other callers (or a reconfiguration)
    /// may have changed the picture while this one slept. Never fails; the
    /// wait is always bounded by the current window length.
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut state = self.shared.state.lock().unwrap();

                let Some(limit) = state.limit else {
                    state.total_admitted += 1;
                    return;
                };

                // Sampled under the lock: a caller preempted between reading
                // the clock and acquiring the lock would append a timestamp
                // older than entries other callers recorded in the meantime,
                // breaking the ascending order eviction relies on.
                let now = self.shared.clock.now();

                // History is time-ordered, so eviction stops at the first
                // entry still inside the window.
                let window = state.window;
                while let Some(&oldest) = state.history.front() {
                    if now.saturating_sub(oldest) >= window {
                        state.history.pop_front();
                    } else {
                        break;
                    }
                }

                if state.history.len() < limit {
                    state.history.push_back(now);
                    state.total_admitted += 1;
                    tracing::trace!(
                        in_window = state.history.len(),
                        total = state.total_admitted,
                        "admission granted"
                    );
                    return;
                }

                match state.history.front().copied() {
                    Some(oldest) => (oldest + window).saturating_sub(now),
                    None => {
                        // Saturated with an empty history only happens with
                        // limit = 0; no wait can free a slot, so admit rather
                        // than hang.
                        state.history.push_back(now);
                        state.total_admitted += 1;
                        return;
                    }
                }
            };

            tracing::debug!(
                wait_ms = wait.as_millis() as u64,
                "window saturated, waiting for oldest admission to expire"
            );
            self.shared.sleeper.sleep(wait).await;
        }
    }

    /// Admit, then run `operation`, typically the transport call the
    /// admission was for. The operation's output is returned untouched; any
    /// transport error is the transport's own, not the throttle's.
    pub async fn execute<T, Fut, Op>(&self, operation: Op) -> T
    where
        Fut: std::future::Future<Output = T>,
        Op: FnOnce() -> Fut,
    {
        self.admit().await;
        operation().await
    }
}
