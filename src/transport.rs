//! Opaque transport collaborator gated by the throttle.
//!
//! The throttle never performs I/O itself; once admission is granted the
//! caller's transport does the actual network call. [`Transport`] is the
//! minimal async seam for that, and [`Throttled`] pairs one transport with
//! one throttle for callers who want a ready-made gated client.
//!
//! Applications that share a single default transport construct one
//! implementor and hand clones of the same [`Throttled`] around; callers
//! with their own session wrap it in a separate `Throttled` sharing the same
//! [`Throttle`] clone.

use async_trait::async_trait;

use crate::throttle::Throttle;

/// One outbound call: a request in, a response or transport error out.
///
/// Errors are entirely the transport's own; the throttle neither generates
/// nor transforms them.
#[async_trait]
pub trait Transport<Req>: Send + Sync {
    type Response;
    type Error;

    async fn send(&self, request: Req) -> Result<Self::Response, Self::Error>;
}

/// A transport whose every `send` first passes the throttle.
#[derive(Debug, Clone)]
pub struct Throttled<T> {
    throttle: Throttle,
    transport: T,
}

impl<T> Throttled<T> {
    pub fn new(throttle: Throttle, transport: T) -> Self {
        Self { throttle, transport }
    }

    /// The throttle gating this transport.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// The underlying transport.
    pub fn inner(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T, Req> Transport<Req> for Throttled<T>
where
    T: Transport<Req>,
    Req: Send + 'static,
{
    type Response = T::Response;
    type Error = T::Error;

    async fn send(&self, request: Req) -> Result<Self::Response, Self::Error> {
        self.throttle.admit().await;
        self.transport.send(request).await
    }
}
