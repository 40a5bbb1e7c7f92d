//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, OnceLock};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneService;
use tower::{Layer, ServiceExt};
use tower_service::Service;

use crate::{
    CachePolicy, Request, Response, TransportError,
    config::TransportConfig,
    connector::https_connector,
    middleware::LoggingLayer,
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased service for middleware composition.
pub type BoxedService = BoxCloneService<Request, Response, TransportError>;

/// Future type for Tower Service implementation.
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'static>>;

/// Thread-safe wrapper for `BoxedService`.
///
/// `BoxCloneService` is not `Sync`; the mutex is only held to clone it.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Each call drives its own clone to readiness, so layers that reserve
    /// capacity in `poll_ready` (concurrency limits) hold it per request.
    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.ready().await?.call(request).await })
    }
}

// ============================================================================
// Raw Transport (internal, direct hyper access)
// ============================================================================

#[derive(Clone)]
struct RawHyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperTransport {
    fn new(config: &TransportConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        // One call, one request on the wire.
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .retry_canceled_requests(false)
            .build(connector);

        Self { inner }
    }

    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>, TransportError> {
        let cache_policy = request.cache_policy();
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match cache_policy {
            CachePolicy::UseProtocolCachePolicy => {}
            CachePolicy::ReloadIgnoringCacheData => {
                let caller_set = headers
                    .keys()
                    .any(|name| name.eq_ignore_ascii_case(http::header::CACHE_CONTROL.as_str()));
                if !caller_set {
                    builder = builder
                        .header(http::header::CACHE_CONTROL, "no-cache")
                        .header(http::header::PRAGMA, "no-cache");
                }
            }
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| TransportError::invalid_request(e.to_string()))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let timeout = request.timeout();
        let hyper_request = Self::build_hyper_request(request)?;

        let exchange = async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let headers = Self::extract_headers(response.headers());

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?
                .to_bytes();

            Ok::<_, TransportError>(Response::new(status, headers, body))
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let msg = format!("{err:?}");

        if err.is_connect() {
            return TransportError::connection(msg);
        }

        let lower = msg.to_lowercase();
        if lower.contains("ssl") || lower.contains("tls") || lower.contains("certificate") {
            return TransportError::tls(msg);
        }

        TransportError::connection(msg)
    }
}

impl Service<Request> for RawHyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// HTTP transport using hyper-util with connection pooling, TLS, and middleware support.
///
/// Cloning is cheap: clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// use courier::{Client, HyperTransport};
///
/// let transport = HyperTransport::builder().with_logging().build();
/// let github = Client::new(transport.clone(), "https://api.github.com")?;
/// let gitlab = Client::new(transport, "https://gitlab.com/api/v4/")?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new transport with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let raw = RawHyperTransport::new(&config);
        Self {
            service: SyncService::new(BoxCloneService::new(raw)),
            config,
        }
    }

    /// The process-wide default transport.
    ///
    /// Every call returns a clone sharing the same connection pool.
    #[must_use]
    pub fn shared() -> Self {
        static SHARED: OnceLock<HyperTransport> = OnceLock::new();
        SHARED.get_or_init(Self::new).clone()
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl courier_core::Transport for HyperTransport {
    type Error = TransportError;

    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.service.call(request).await
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use courier::HyperTransport;
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .connect_timeout(Duration::from_secs(5))
///     .with_logging()
///     .build();
/// ```
#[derive(Default)]
pub struct HyperTransportBuilder {
    config: TransportConfig,
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperTransportBuilder {
    /// Replace all connection settings at once.
    #[must_use]
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.with_pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout, `None` to keep idle connections.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.config = self.config.with_pool_idle_timeout(timeout.into());
        self
    }

    /// Add a Tower layer to the transport.
    ///
    /// Layers are applied in order: first added = outermost (sees requests first).
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layers.push(Arc::new(move |service: BoxedService| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Log the outcome of every exchange.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log the outcome of every exchange plus request and response headers.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::new().with_headers())
    }

    /// Build the transport with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let config = self.config;
        let mut service: BoxedService = BoxCloneService::new(RawHyperTransport::new(&config));

        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        HyperTransport {
            service: SyncService::new(service),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;
    use url::Url;

    use super::*;

    fn request(cache_policy: CachePolicy, headers: &[(&str, &str)]) -> Request {
        let url = Url::parse("https://api.example.com/users?page=1").expect("valid URL");
        Request::new(Method::Post, url, Duration::from_secs(30))
            .with_headers(
                headers
                    .iter()
                    .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                    .collect(),
            )
            .with_body(Some(Bytes::from_static(b"payload")))
            .with_cache_policy(cache_policy)
    }

    #[test]
    fn hyper_request_is_verbatim() {
        let hyper_request = RawHyperTransport::build_hyper_request(request(
            CachePolicy::UseProtocolCachePolicy,
            &[("X-Custom", "value")],
        ))
        .expect("request");

        assert_eq!(hyper_request.method(), http::Method::POST);
        assert_eq!(
            hyper_request.uri().to_string(),
            "https://api.example.com/users?page=1"
        );
        assert_eq!(hyper_request.headers().len(), 1);
        assert_eq!(
            hyper_request.headers().get("x-custom").map(|v| v.as_bytes()),
            Some(b"value".as_slice())
        );
    }

    #[test]
    fn reload_policy_adds_no_cache_headers() {
        let hyper_request = RawHyperTransport::build_hyper_request(request(
            CachePolicy::ReloadIgnoringCacheData,
            &[],
        ))
        .expect("request");

        let headers = hyper_request.headers();
        assert_eq!(
            headers.get(http::header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-cache".as_slice())
        );
        assert_eq!(
            headers.get(http::header::PRAGMA).map(|v| v.as_bytes()),
            Some(b"no-cache".as_slice())
        );
    }

    #[test]
    fn reload_policy_keeps_caller_cache_control() {
        let hyper_request = RawHyperTransport::build_hyper_request(request(
            CachePolicy::ReloadIgnoringCacheData,
            &[("Cache-Control", "max-age=0")],
        ))
        .expect("request");

        let headers = hyper_request.headers();
        assert_eq!(headers.get_all(http::header::CACHE_CONTROL).iter().count(), 1);
        assert_eq!(
            headers.get(http::header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"max-age=0".as_slice())
        );
        assert!(headers.get(http::header::PRAGMA).is_none());
    }

    #[test]
    fn invalid_header_name_is_invalid_request() {
        let err = RawHyperTransport::build_hyper_request(request(
            CachePolicy::UseProtocolCachePolicy,
            &[("bad header", "value")],
        ))
        .expect_err("header names cannot contain spaces");

        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn transport_default() {
        let transport = HyperTransport::new();
        assert_eq!(transport.config().connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn transport_builder() {
        let transport = HyperTransport::builder()
            .connect_timeout(Duration::from_secs(3))
            .pool_idle_per_host(4)
            .pool_idle_timeout(None)
            .with_logging()
            .build();

        assert_eq!(transport.config().connect_timeout, Duration::from_secs(3));
        assert_eq!(transport.config().pool_idle_per_host, 4);
        assert_eq!(transport.config().pool_idle_timeout, None);

        let debug = format!("{:?}", HyperTransport::builder().with_logging());
        assert!(debug.contains("layers_count: 1"));
    }

    #[test]
    fn shared_transport_is_reused() {
        let first = HyperTransport::shared();
        let second = HyperTransport::shared();
        assert!(Arc::ptr_eq(&first.service.inner, &second.service.inner));
    }

    #[test]
    fn transport_is_debug() {
        let debug = format!("{:?}", HyperTransport::new());
        assert!(debug.contains("HyperTransport"));
    }
}
