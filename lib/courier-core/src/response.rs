//! Transport-level HTTP responses and their validation.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Result};

/// Status line and headers of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: u16,
    headers: HashMap<String, String>,
}

impl ResponseHead {
    /// Creates a response head.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>) -> Self {
        Self { status, headers }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// Response returned by a [`Transport`](crate::Transport).
///
/// The head is optional: a transport that reaches something other than an
/// HTTP server (a data URL, a file) yields a body without one.
#[derive(Debug, Clone)]
pub struct Response {
    head: Option<ResponseHead>,
    body: Bytes,
}

impl Response {
    /// Creates an HTTP response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            head: Some(ResponseHead::new(status, headers)),
            body,
        }
    }

    /// Creates a response carrying no HTTP metadata.
    #[must_use]
    pub const fn without_head(body: Bytes) -> Self {
        Self { head: None, body }
    }

    /// Status line and headers, if this is an HTTP response.
    #[must_use]
    pub const fn head(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    /// HTTP status code, if this is an HTTP response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.head.as_ref().map(ResponseHead::status)
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head
            .as_ref()
            .and_then(|head| head.headers.get(name))
            .map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|status| (200..300).contains(&status))
    }

    /// Check that the response is an HTTP response with a 2xx status.
    ///
    /// Headers and body are not inspected.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidResponse`] when there is no HTTP metadata
    /// - [`Error::RequestFailed`] when the status is outside of `200..=299`
    pub fn validate(&self) -> Result<()> {
        let head = self.head.as_ref().ok_or(Error::InvalidResponse)?;
        match head.status {
            200..=299 => Ok(()),
            status => Err(Error::RequestFailed(status)),
        }
    }
}
