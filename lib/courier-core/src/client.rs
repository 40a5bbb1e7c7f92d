//! The request executor.
//!
//! [`Client`] binds a base URL, a [`Transport`] and a [`JsonDecoder`] together
//! and runs each [`Specification`] through the same single-attempt pipeline:
//!
//! 1. resolve the URL ([`resolve_url`](crate::resolve_url))
//! 2. send one request over the transport
//! 3. validate the status ([`Response::validate`](crate::Response::validate))
//! 4. hand the body to the [`ResultMode`]
//!
//! Any failure is returned as is. Nothing is retried, cached or suppressed.

use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, debug_span};
use url::Url;

use crate::{
    CachePolicy, ClientConfig, ClientConfigBuilder, Decode, Error, JsonDecoder,
    KeyDecodingStrategy, RawBytes, Request, Result, ResultMode, Specification, Transport,
    resolve_url,
};

/// Executes [`Specification`]s against a fixed base URL.
///
/// A client holds no per-request state: share it behind a reference or an
/// `Arc` and call [`execute`](Self::execute) from as many tasks as needed.
///
/// # Example
///
/// ```ignore
/// use courier_core::{Client, Method, Specification};
///
/// #[derive(serde::Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User { user_name: String }
///
/// let client = Client::new(transport, "https://api.example.com")?;
/// let spec = Specification::new(Method::Get, "/users/123");
/// let user: User = client.fetch(&spec).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<T> {
    base_url: Url,
    transport: T,
    decoder: JsonDecoder,
    config: ClientConfig,
}

fn ensure_base(base_url: Url) -> Result<Url> {
    if base_url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(base_url)
}

impl<T: Transport> Client<T> {
    /// Create a client with the default decoder and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an absolute URL that
    /// can act as a base.
    pub fn new(transport: T, base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(transport, base_url).build()
    }

    /// Create a client from a pre-parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` cannot act as a base.
    pub fn with_url(transport: T, base_url: Url) -> Result<Self> {
        Ok(Self {
            base_url: ensure_base(base_url)?,
            transport,
            decoder: JsonDecoder::default(),
            config: ClientConfig::default(),
        })
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder(transport: T, base_url: impl AsRef<str>) -> ClientBuilder<T> {
        ClientBuilder {
            base_url: base_url.as_ref().to_string(),
            transport,
            decoder: JsonDecoder::default(),
            config: ClientConfig::builder(),
        }
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Decoder applied to every decoded response.
    #[must_use]
    pub const fn decoder(&self) -> &JsonDecoder {
        &self.decoder
    }

    /// Per-request settings.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute `spec` and produce a result according to `mode`.
    ///
    /// Exactly one request is sent, unless the URL cannot be built, in which
    /// case nothing is sent at all.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the endpoint or query parameters do not resolve
    /// - [`Error::Unknown`] if the transport fails
    /// - [`Error::InvalidResponse`] if the response has no HTTP metadata
    /// - [`Error::RequestFailed`] if the status is outside of `200..=299`
    /// - [`Error::DecodingFailed`] if the body does not match the decoded type
    pub async fn execute<M: ResultMode>(
        &self,
        spec: &Specification,
        mode: M,
    ) -> Result<M::Output> {
        let span = debug_span!(
            "execute",
            method = %spec.method(),
            endpoint = spec.endpoint(),
        );

        async move {
            let request = self.prepare(spec).inspect_err(|err| {
                debug!(error = %err, "could not build request URL");
            })?;

            debug!(url = %request.url(), "sending request");
            let start = Instant::now();

            let response = self.transport.send(request).await.map_err(|err| {
                debug!(error = %err, "transport failed");
                Error::unknown(err)
            })?;

            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            debug!(status = response.status(), elapsed_ms, "response received");

            response.validate().inspect_err(|err| {
                debug!(error = %err, "response rejected");
            })?;

            mode.extract(response.into_body(), &self.decoder)
                .inspect_err(|err| {
                    debug!(error = %err, "could not extract result");
                })
        }
        .instrument(span)
        .await
    }

    /// Execute `spec` and decode the body into `R`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn fetch<R: DeserializeOwned>(&self, spec: &Specification) -> Result<R> {
        self.execute(spec, Decode::<R>::new()).await
    }

    /// Execute `spec` and return the body untouched.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn fetch_bytes(&self, spec: &Specification) -> Result<Bytes> {
        self.execute(spec, RawBytes).await
    }

    fn prepare(&self, spec: &Specification) -> Result<Request> {
        let url = resolve_url(&self.base_url, spec.endpoint(), spec.query_parameters())?;

        Ok(Request::new(spec.method(), url, self.config.timeout)
            .with_headers(spec.headers().cloned().unwrap_or_default())
            .with_body(spec.body().cloned())
            .with_cache_policy(self.config.cache_policy))
    }
}

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder<T> {
    base_url: String,
    transport: T,
    decoder: JsonDecoder,
    config: ClientConfigBuilder,
}

impl<T: Transport> ClientBuilder<T> {
    /// Replace the decoder.
    #[must_use]
    pub fn decoder(mut self, decoder: JsonDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Enable or disable the `snake_case` to `camelCase` key conversion.
    #[must_use]
    pub fn convert_from_snake_case(mut self, enabled: bool) -> Self {
        let strategy = if enabled {
            KeyDecodingStrategy::ConvertFromSnakeCase
        } else {
            KeyDecodingStrategy::UseDefaultKeys
        };
        self.decoder = JsonDecoder::new(strategy);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the cache policy.
    #[must_use]
    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.config = self.config.cache_policy(cache_policy);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL does not parse or cannot
    /// act as a base.
    pub fn build(self) -> Result<Client<T>> {
        let base_url = ensure_base(Url::parse(&self.base_url)?)?;
        Ok(Client {
            base_url,
            transport: self.transport,
            decoder: self.decoder,
            config: self.config.build(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::convert::Infallible;

    use assert2::{check, let_assert};

    use super::*;
    use crate::Response;

    struct Ok200;

    impl Transport for Ok200 {
        type Error = Infallible;

        async fn send(&self, _request: Request) -> std::result::Result<Response, Infallible> {
            Ok(Response::new(200, HashMap::new(), Bytes::new()))
        }
    }

    #[test]
    fn client_defaults() {
        let client = Client::new(Ok200, "https://api.example.com").expect("client");
        check!(client.base_url().as_str() == "https://api.example.com/");
        check!(client.decoder().key_strategy() == KeyDecodingStrategy::ConvertFromSnakeCase);
        check!(client.config().timeout == Duration::from_secs(30));
        check!(client.config().cache_policy == CachePolicy::UseProtocolCachePolicy);
    }

    #[test]
    fn builder_overrides() {
        let client = Client::builder(Ok200, "https://api.example.com/v1/")
            .convert_from_snake_case(false)
            .timeout(Duration::from_secs(5))
            .cache_policy(CachePolicy::ReloadIgnoringCacheData)
            .build()
            .expect("client");

        check!(client.decoder().key_strategy() == KeyDecodingStrategy::UseDefaultKeys);
        check!(client.config().timeout == Duration::from_secs(5));
        check!(client.config().cache_policy == CachePolicy::ReloadIgnoringCacheData);
    }

    #[test]
    fn invalid_base_url() {
        let_assert!(Err(Error::InvalidUrl(_)) = Client::new(Ok200, "not a url"));
        let_assert!(
            Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)) =
                Client::new(Ok200, "mailto:team@example.com")
        );

        let url = Url::parse("data:text/plain,hello").expect("valid URL");
        let_assert!(Err(Error::InvalidUrl(_)) = Client::with_url(Ok200, url));
    }

    #[test]
    fn prepare_copies_specification_verbatim() {
        let client = Client::builder(Ok200, "https://api.example.com")
            .timeout(Duration::from_secs(7))
            .build()
            .expect("client");

        let spec = Specification::builder(crate::Method::Put, "/items/9")
            .header("Content-Type", "text/plain")
            .query("dry_run", "true")
            .body("payload")
            .build();

        let request = client.prepare(&spec).expect("request");
        check!(request.method() == crate::Method::Put);
        check!(request.url().as_str() == "https://api.example.com/items/9?dry_run=true");
        check!(request.headers() == spec.headers().expect("headers"));
        check!(request.body() == spec.body());
        check!(request.timeout() == Duration::from_secs(7));
        check!(request.cache_policy() == CachePolicy::UseProtocolCachePolicy);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client<Ok200>>();
    }
}
