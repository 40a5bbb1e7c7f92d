//! Declarative request descriptions.
//!
//! A [`Specification`] says *what* to request relative to a client's base URL.
//! It has no behavior of its own; [`Client::execute`](crate::Client::execute)
//! reads it and never mutates it.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Specification};
//!
//! let spec = Specification::builder(Method::Get, "/search")
//!     .header("Accept", "application/json")
//!     .query("q", "rust")
//!     .build();
//!
//! assert_eq!(spec.endpoint(), "/search");
//! assert_eq!(spec.query_parameters().map(|q| q.len()), Some(1));
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;

use crate::{EncodeError, JsonEncoder, Method};

/// Description of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    endpoint: String,
    method: Method,
    headers: Option<HashMap<String, String>>,
    body: Option<Bytes>,
    query_parameters: Option<HashMap<String, String>>,
}

impl Specification {
    /// Creates a specification without headers, body or query parameters.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            headers: None,
            body: None,
            query_parameters: None,
        }
    }

    /// Creates a new [`SpecificationBuilder`].
    #[must_use]
    pub fn builder(method: Method, endpoint: impl Into<String>) -> SpecificationBuilder {
        SpecificationBuilder {
            spec: Self::new(method, endpoint),
        }
    }

    /// Path relative to the client's base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Headers sent verbatim.
    #[must_use]
    pub const fn headers(&self) -> Option<&HashMap<String, String>> {
        self.headers.as_ref()
    }

    /// Raw body sent verbatim.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Parameters appended as the query string.
    #[must_use]
    pub const fn query_parameters(&self) -> Option<&HashMap<String, String>> {
        self.query_parameters.as_ref()
    }
}

/// Builder for constructing [`Specification`] instances.
#[derive(Debug, Clone)]
pub struct SpecificationBuilder {
    spec: Specification,
}

impl SpecificationBuilder {
    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec
            .headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.spec
            .headers
            .get_or_insert_with(HashMap::new)
            .extend(headers);
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec
            .query_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets multiple query parameters.
    #[must_use]
    pub fn query_parameters(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.spec
            .query_parameters
            .get_or_insert_with(HashMap::new)
            .extend(pairs);
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.spec.body = Some(body.into());
        self
    }

    /// Set a JSON body with keys used verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, EncodeError> {
        self.json_with(&JsonEncoder::default(), value)
    }

    /// Set a JSON body produced by `encoder`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json_with<T: Serialize + ?Sized>(
        self,
        encoder: &JsonEncoder,
        value: &T,
    ) -> Result<Self, EncodeError> {
        let body = encoder.encode(value)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    /// Builds the [`Specification`].
    #[must_use]
    pub fn build(self) -> Specification {
        self.spec
    }
}
