//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    CachePolicy, Client, Courier, Decode, Error, HyperTransport, Method, RawBytes, Result,
    Specification, StatusCode, Transport, TransportError, client, header,
};
pub use serde::{Deserialize, Serialize};
