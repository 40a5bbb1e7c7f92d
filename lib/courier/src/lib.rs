//! Declarative HTTP client for Rust.
//!
//! Describe a request with a [`Specification`], hand it to a [`Client`], get
//! back raw bytes or a typed value.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct User {
//!     id: u64,
//!     display_name: String,
//! }
//!
//! let api = courier::client("https://api.example.com")?;
//! let spec = Specification::new(Method::Get, "/users/42");
//! let user: User = api.fetch(&spec).await?;
//! ```
//!
//! Response keys arrive in `snake_case` and are rewritten to `camelCase`
//! before decoding, see [`KeyDecodingStrategy`].

mod config;
mod connector;
mod error;
pub mod middleware;
pub mod prelude;
mod transport;

pub use config::TransportConfig;
pub use connector::https_connector;
pub use error::TransportError;
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export core types
pub use courier_core::{
    BoxError, CachePolicy, Client, ClientBuilder, ClientConfig, ClientConfigBuilder, Decode,
    DecodeError, DecodeErrorKind, EncodeError, Error, JsonDecoder, JsonEncoder,
    KeyDecodingStrategy, KeyEncodingStrategy, Method, NetworkError, RawBytes, Request, Response,
    ResponseHead, Result, ResultMode, Specification, SpecificationBuilder, Transport,
    UnsupportedMethod, camel_to_snake, resolve_url, snake_to_camel,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};

// Re-export tower for middleware composition
pub use tower;
pub use url;

/// A [`Client`] backed by the hyper transport.
pub type Courier = Client<HyperTransport>;

/// Create a client for `base_url` on the shared default transport.
///
/// # Example
///
/// ```ignore
/// let api = courier::client("https://api.example.com/v1/")?;
/// ```
pub fn client(base_url: impl AsRef<str>) -> Result<Courier> {
    Client::new(HyperTransport::shared(), base_url)
}

/// Start configuring a client for `base_url` on the shared default transport.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
///
/// let api = courier::builder("https://api.example.com")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// ```
#[must_use]
pub fn builder(base_url: impl AsRef<str>) -> ClientBuilder<HyperTransport> {
    Client::builder(HyperTransport::shared(), base_url)
}
