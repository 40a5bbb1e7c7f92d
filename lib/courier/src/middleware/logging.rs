//! Exchange logging middleware.
//!
//! [`Client::execute`](crate::Client::execute) already traces dispatch and
//! timing of every call. This layer sits on the wire side and records what
//! came back, classified the way the client is going to report it.

use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, ServiceFuture, TransportError};

/// Layer that logs the outcome of every exchange.
///
/// # Example
///
/// ```ignore
/// use courier::HyperTransport;
/// use courier::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::new().with_headers())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    headers: bool,
}

impl LoggingLayer {
    /// Log outcomes only.
    #[must_use]
    pub const fn new() -> Self {
        Self { headers: false }
    }

    /// Also log request and response headers at debug level.
    #[must_use]
    pub const fn with_headers(mut self) -> Self {
        self.headers = true;
        self
    }

    /// Whether headers are logged.
    #[must_use]
    pub const fn logs_headers(&self) -> bool {
        self.headers
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            headers: self.headers,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    headers: bool,
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let url = request.url();
        let span = info_span!(
            "exchange",
            method = %request.method(),
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
        );
        if self.headers {
            debug!(parent: &span, headers = ?request.headers(), "request headers");
        }

        // Keep the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = self.headers;

        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => log_response(response, headers, elapsed_ms),
                    Err(err) => log_failure(err, elapsed_ms),
                }
                result
            }
            .instrument(span),
        )
    }
}

fn log_response(response: &Response, headers: bool, elapsed_ms: u64) {
    let bytes = response.body().len();
    match response.validate() {
        Ok(()) => info!(status = response.status(), bytes, elapsed_ms, "exchange succeeded"),
        Err(Error::RequestFailed(status)) => {
            warn!(status, bytes, elapsed_ms, "status outside of 2xx");
        }
        Err(err) => warn!(error = %err, bytes, elapsed_ms, "response without HTTP head"),
    }

    if headers && let Some(head) = response.head() {
        debug!(headers = ?head.headers(), "response headers");
    }
}

fn log_failure(err: &TransportError, elapsed_ms: u64) {
    match err {
        TransportError::Timeout(limit) => warn!(?limit, elapsed_ms, "exchange timed out"),
        TransportError::InvalidRequest(reason) => {
            warn!(%reason, "request rejected before sending");
        }
        other => warn!(error = %other, elapsed_ms, "exchange failed"),
    }
}
