//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    CachePolicy, Client, Decode, Error, JsonDecoder, JsonEncoder, KeyDecodingStrategy,
    KeyEncodingStrategy, Method, RawBytes, Request, Response, Result, ResultMode, Specification,
    Transport,
};
