//! Result modes: what to do with a validated response body.
//!
//! The caller picks the mode at the call site, so whether the body is decoded
//! is known statically:
//!
//! - [`RawBytes`] returns the body untouched, no decoding is attempted
//! - [`Decode<T>`] decodes the body into `T` with the client's [`JsonDecoder`]

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{Error, JsonDecoder, Result};

/// How a response body becomes the result of [`Client::execute`](crate::Client::execute).
pub trait ResultMode {
    /// The value produced on success.
    type Output;

    /// Turn a validated body into the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be turned into `Output`.
    fn extract(self, body: Bytes, decoder: &JsonDecoder) -> Result<Self::Output>;
}

/// Return the body exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawBytes;

impl ResultMode for RawBytes {
    type Output = Bytes;

    fn extract(self, body: Bytes, _decoder: &JsonDecoder) -> Result<Bytes> {
        Ok(body)
    }
}

/// Decode the body into `T`.
pub struct Decode<T>(PhantomData<fn() -> T>);

impl<T> Decode<T> {
    /// Creates the mode.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Decode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Decode<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Decode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decode")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> ResultMode for Decode<T> {
    type Output = T;

    fn extract(self, body: Bytes, decoder: &JsonDecoder) -> Result<T> {
        decoder.decode(&body).map_err(|err| {
            if err.kind().is_structural() {
                Error::DecodingFailed(err)
            } else {
                Error::unknown(err)
            }
        })
    }
}
