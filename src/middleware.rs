//! Tower middleware that gates an inner service behind a [`Throttle`].
//!
//! Unlike a denying rate limiter, this middleware never rejects: a saturated
//! window delays the call until a slot frees up, then forwards the request.
//! The service's error type is the inner service's own, since admission
//! cannot fail.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower_layer::Layer;
use tower_service::Service;

use crate::throttle::Throttle;

/// Layer that wraps a service in a [`ThrottleService`].
///
/// Clones of the layer (and of the services it produces) share the same
/// throttle, so one layer applied to several clients enforces one aggregate
/// rate.
#[derive(Clone, Debug)]
pub struct ThrottleLayer {
    throttle: Throttle,
}

impl ThrottleLayer {
    pub fn new(throttle: Throttle) -> Self {
        Self { throttle }
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = ThrottleService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ThrottleService { inner: service, throttle: self.throttle.clone() }
    }
}

/// Middleware service that awaits admission before each call.
#[derive(Clone, Debug)]
pub struct ThrottleService<S> {
    inner: S,
    throttle: Throttle,
}

impl<S, Req> Service<Req> for ThrottleService<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let throttle = self.throttle.clone();
        // Take the service the caller polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            throttle.admit().await;
            inner.call(req).await
        })
    }
}
