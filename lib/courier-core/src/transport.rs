//! The transport seam.
//!
//! [`Transport`] is the only thing [`Client`](crate::Client) needs from an HTTP
//! stack: send one resolved [`Request`] and hand back the [`Response`]. The
//! `courier` crate provides a hyper-based implementation; tests plug in their
//! own.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response};

/// Low-level HTTP execution.
///
/// Implementations own pooling, TLS, redirects and the enforcement of
/// [`Request::timeout`]. They must not interpret the status code.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::convert::Infallible;
/// use courier_core::{Request, Response, Transport};
///
/// struct Echo;
///
/// impl Transport for Echo {
///     type Error = Infallible;
///
///     async fn send(&self, request: Request) -> Result<Response, Self::Error> {
///         let body = request.body().cloned().unwrap_or_default();
///         Ok(Response::new(200, HashMap::new(), body))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Transport failure: connectivity, TLS, timeout, body read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a request and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    type Error = T::Error;

    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send {
        T::send(self, request)
    }
}

impl<T: Transport> Transport for &T {
    type Error = T::Error;

    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send {
        T::send(self, request)
    }
}
