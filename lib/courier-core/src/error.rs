//! Error types for courier.

use derive_more::{Display, Error, From};

use crate::DecodeError;

/// Boxed error used for failures outside of the closed taxonomy.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a [`Client::execute`](crate::Client::execute) call.
///
/// Exactly one variant is produced per failure, carrying only the data needed
/// to diagnose it.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The base URL, endpoint or query parameters did not form a valid URL.
    #[display("Invalid URL: {_0}.")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The transport returned a response without HTTP metadata.
    #[display("Invalid response from the server.")]
    #[from(skip)]
    InvalidResponse,

    /// The status code was outside of `200..=299`.
    #[display("Request failed with status code {_0}.")]
    #[from(skip)]
    RequestFailed(#[error(not(source))] u16),

    /// The body did not match the expected shape.
    #[display("Failed to decode response: {_0}")]
    #[from]
    DecodingFailed(DecodeError),

    /// Any other failure, including every transport error.
    #[display("Unknown error: {_0}")]
    #[from(skip)]
    Unknown(#[error(not(source))] BoxError),
}

/// Alias kept for callers that name the taxonomy explicitly.
pub type NetworkError = Error;

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an arbitrary error as [`Error::Unknown`].
    #[must_use]
    pub fn unknown(err: impl Into<BoxError>) -> Self {
        Self::Unknown(err.into())
    }

    /// Returns the HTTP status code if this is a [`Error::RequestFailed`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed(status) => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is an [`Error::InvalidUrl`].
    #[must_use]
    pub const fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidUrl(_))
    }

    /// Returns `true` if the decoder rejected the body.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::DecodingFailed(_))
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
