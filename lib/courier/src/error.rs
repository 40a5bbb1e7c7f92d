//! Transport error types.

use std::time::Duration;

use derive_more::{Display, Error};

/// Failure of [`HyperTransport`](crate::HyperTransport) to obtain a response.
///
/// The client surfaces every one of these as
/// [`Error::Unknown`](crate::Error::Unknown).
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// No response within the request timeout.
    #[display("request timed out after {_0:?}")]
    Timeout(#[error(not(source))] Duration),

    /// The response body could not be read.
    #[display("failed to read response body: {_0}")]
    Body(#[error(not(source))] String),

    /// The request could not be turned into an HTTP request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
