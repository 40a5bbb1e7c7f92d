//! Core types and request pipeline for the courier declarative HTTP client.
//!
//! This crate provides the transport-agnostic pieces of courier:
//! - [`Specification`] - declarative description of one request
//! - [`Client`] - executes specifications against a base URL
//! - [`Method`] - HTTP method enum
//! - [`Transport`] - seam to the HTTP stack, with [`Request`] and [`Response`]
//! - [`ResultMode`] - [`RawBytes`] or [`Decode`], chosen per call
//! - [`JsonDecoder`] and [`JsonEncoder`] - JSON bodies with key strategies
//! - [`Error`] and [`Result`] - the error taxonomy
//!
//! The `courier` crate adds a hyper-based transport.

mod client;
mod codec;
mod config;
mod error;
mod method;
mod mode;
pub mod prelude;
mod rename;
mod request;
mod resolve;
mod response;
mod specification;
mod transport;

pub use client::{Client, ClientBuilder};
pub use codec::{
    DecodeError, DecodeErrorKind, EncodeError, JsonDecoder, JsonEncoder, KeyDecodingStrategy,
    KeyEncodingStrategy, camel_to_snake, snake_to_camel,
};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{BoxError, Error, NetworkError, Result};
pub use method::{Method, UnsupportedMethod};
pub use mode::{Decode, RawBytes, ResultMode};
pub use request::{CachePolicy, Request};
pub use resolve::resolve_url;
pub use response::{Response, ResponseHead};
pub use specification::{Specification, SpecificationBuilder};
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
