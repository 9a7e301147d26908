#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Pacer
//!
//! Client-side sliding-window request throttle for async Rust: no more than
//! `limit` admissions per rolling `window`, with callers suspended exactly as
//! long as needed and not a tick longer.
//!
//! ## Features
//!
//! - **Sliding-window admission** with lazy front-to-back eviction
//! - **Exact waits**: sleeps until the oldest in-window admission expires,
//!   never a fixed poll interval
//! - **Concurrency-safe**: one mutex around the history, released while
//!   sleeping, with a check-wait-recheck loop on wake
//! - **Live reconfiguration**: limit and window changes apply to the next
//!   admission check
//! - **Transport-agnostic**: gate a closure, a [`Transport`] implementor, or
//!   any tower service via [`ThrottleLayer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use pacer::Throttle;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // At most 12 requests per minute.
//!     let throttle = Throttle::new(12, Duration::from_secs(60));
//!
//!     let body = throttle
//!         .execute(|| async {
//!             // Your transport call here
//!             "response"
//!         })
//!         .await;
//!     assert_eq!(body, "response");
//! }
//! ```

pub mod clock;
pub mod middleware;
pub mod sleeper;
pub mod throttle;
pub mod transport;

// Re-exports
pub use clock::{Clock, ManualClock, TokioClock};
pub use middleware::{ThrottleLayer, ThrottleService};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use throttle::{Throttle, DEFAULT_WINDOW};
pub use transport::{Throttled, Transport};
