//! The tower layer and the `Transport` wrapper against a shared throttle.

use pacer::{Throttle, ThrottleLayer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::{service_fn, Layer, ServiceExt};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestError: {}", self.0)
    }
}

impl std::error::Error for TestError {}

#[tokio::test(start_paused = true)]
async fn layered_service_spaces_calls_by_the_window() {
    let throttle = Throttle::new(1, Duration::from_secs(1));
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let service = service_fn(move |req: &'static str| {
        let calls = calls_clone.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TestError>(req.len())
        }
    });
    let gated = ThrottleLayer::new(throttle.clone()).layer(service);

    let start = Instant::now();
    assert_eq!(gated.clone().oneshot("GET /a").await.unwrap(), 6);
    assert_eq!(start.elapsed(), Duration::ZERO);

    assert_eq!(gated.clone().oneshot("GET /bb").await.unwrap(), 7);
    assert!(start.elapsed() >= Duration::from_secs(1));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(throttle.total_admitted(), 2);
}

#[tokio::test(start_paused = true)]
async fn inner_errors_pass_through_untouched() {
    let throttle = Throttle::unlimited();
    let service =
        service_fn(|_req: ()| async { Err::<(), _>(TestError("connection reset".into())) });
    let gated = ThrottleLayer::new(throttle).layer(service);

    let err = gated.oneshot(()).await.unwrap_err();
    assert_eq!(err, TestError("connection reset".into()));
}

#[tokio::test(start_paused = true)]
async fn service_clones_share_one_aggregate_rate() {
    let throttle = Throttle::new(1, Duration::from_secs(1));
    let service = service_fn(|req: u32| async move { Ok::<_, TestError>(req) });
    let layer = ThrottleLayer::new(throttle);

    let a = layer.layer(service.clone());
    let b = layer.layer(service);

    let start = Instant::now();
    a.oneshot(1).await.unwrap();
    b.oneshot(2).await.unwrap();

    // Two distinct services behind the same layer still obey one limit.
    assert!(start.elapsed() >= Duration::from_secs(1));
}
