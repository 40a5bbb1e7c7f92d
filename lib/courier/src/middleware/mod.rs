//! Tower middleware layers for the hyper transport.
//!
//! Layers wrap the type-erased transport service and see every
//! [`Request`](crate::Request) before it goes on the wire. Add them with
//! [`HyperTransportBuilder::layer`](crate::HyperTransportBuilder::layer).
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`ConcurrencyLimitLayer`] - Limits concurrent requests (from tower)
//!
//! ```ignore
//! use courier::HyperTransport;
//! use courier::middleware::{ConcurrencyLimitLayer, LoggingLayer};
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::new())
//!     .layer(ConcurrencyLimitLayer::new(8))
//!     .build();
//! ```

mod logging;

pub use logging::{Logging, LoggingLayer};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
