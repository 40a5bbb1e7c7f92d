//! Connection pool and connector settings.

use std::time::Duration;

/// Settings of the connections a [`HyperTransport`](crate::HyperTransport) opens.
///
/// How long one exchange may take is decided per request, from the client's
/// [`ClientConfig`](crate::ClientConfig); these settings only shape the
/// connector and the idle pool shared by every client using the transport.
///
/// ```
/// use std::time::Duration;
/// use courier::TransportConfig;
///
/// let config = TransportConfig::new()
///     .with_connect_timeout(Duration::from_secs(2))
///     .without_pooling();
/// assert_eq!(config.pool_idle_per_host, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound for establishing a TCP connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host. `0` disables reuse.
    pub pool_idle_per_host: usize,
    /// How long an idle connection stays in the pool, `None` for no limit.
    pub pool_idle_timeout: Option<Duration>,
}

impl TransportConfig {
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default number of idle connections per host.
    pub const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
    /// Default idle connection lifetime.
    pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Settings used by [`HyperTransport::new`](crate::HyperTransport::new).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            pool_idle_per_host: Self::DEFAULT_POOL_IDLE_PER_HOST,
            pool_idle_timeout: Some(Self::DEFAULT_POOL_IDLE_TIMEOUT),
        }
    }

    /// Replace the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Replace the number of idle connections kept per host.
    #[must_use]
    pub const fn with_pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = count;
        self
    }

    /// Replace the idle connection lifetime.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Open a fresh connection for every request.
    #[must_use]
    pub const fn without_pooling(self) -> Self {
        self.with_pool_idle_per_host(0)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}
