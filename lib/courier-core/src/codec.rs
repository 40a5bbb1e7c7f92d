//! JSON body encoding and decoding with key-naming strategies.
//!
//! Servers commonly speak `snake_case` while Rust response types are annotated
//! with `#[serde(rename_all = "camelCase")]`. [`JsonDecoder`] rewrites every
//! object key while the payload is parsed, so one decoder configuration
//! applies uniformly to every response.

use bytes::Bytes;
use derive_more::{Display, Error, From};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::rename::RenameKeys;

// ============================================================================
// Key strategies
// ============================================================================

/// How object keys of a response body are mapped before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyDecodingStrategy {
    /// Keys are used verbatim.
    UseDefaultKeys,
    /// `snake_case` keys are rewritten to `camelCase`.
    #[default]
    ConvertFromSnakeCase,
}

/// How object keys of a request body are mapped after encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEncodingStrategy {
    /// Keys are used verbatim.
    #[default]
    UseDefaultKeys,
    /// `camelCase` keys are rewritten to `snake_case`.
    ConvertToSnakeCase,
}

/// Convert a `snake_case` key to `camelCase`.
///
/// Leading and trailing underscores are kept. The first word is lowercased,
/// every following word is capitalized. Keys without an interior underscore
/// are returned unchanged.
///
/// ```
/// use courier_core::snake_to_camel;
///
/// assert_eq!(snake_to_camel("user_name"), "userName");
/// assert_eq!(snake_to_camel("USER_NAME"), "userName");
/// assert_eq!(snake_to_camel("_private_key_"), "_privateKey_");
/// assert_eq!(snake_to_camel("alreadyCamel"), "alreadyCamel");
/// ```
#[must_use]
pub fn snake_to_camel(key: &str) -> String {
    let core = key.trim_matches('_');
    if core.is_empty() || !core.contains('_') {
        return key.to_string();
    }

    let leading = key
        .get(..key.len() - key.trim_start_matches('_').len())
        .unwrap_or_default();
    let trailing = key
        .get(key.trim_end_matches('_').len()..)
        .unwrap_or_default();

    let mut words = core.split('_').filter(|word| !word.is_empty());
    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    if let Some(first) = words.next() {
        out.push_str(&first.to_lowercase());
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(trailing);
    out
}

/// Convert a `camelCase` key to `snake_case`.
///
/// Acronym runs stay together: `myURLValue` becomes `my_url_value`.
///
/// ```
/// use courier_core::camel_to_snake;
///
/// assert_eq!(camel_to_snake("userName"), "user_name");
/// assert_eq!(camel_to_snake("myURLValue"), "my_url_value");
/// assert_eq!(camel_to_snake("plain"), "plain");
/// ```
#[must_use]
pub fn camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (index, &current) in chars.iter().enumerate() {
        if current.is_uppercase() && index > 0 {
            let previous = chars.get(index - 1).copied();
            let next = chars.get(index + 1).copied();
            let after_word = previous.is_some_and(|c| c.is_lowercase() || c.is_ascii_digit());
            let ends_acronym = previous.is_some_and(char::is_uppercase)
                && next.is_some_and(char::is_lowercase);
            if after_word || ends_acronym {
                out.push('_');
            }
        }
        out.extend(current.to_lowercase());
    }
    out
}

fn rewrite_keys(value: Value, convert: &impl Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (convert(&key), rewrite_keys(value, convert)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rewrite_keys(item, convert))
                .collect(),
        ),
        other => other,
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Category of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DecodeErrorKind {
    /// The body is not syntactically valid JSON.
    #[display("syntax")]
    Syntax,
    /// Valid JSON that does not match the target type.
    #[display("data")]
    Data,
    /// The body ended before a complete value was read.
    #[display("EOF")]
    Eof,
    /// Failure while reading the body.
    #[display("I/O")]
    Io,
}

impl DecodeErrorKind {
    /// Returns `true` for failures caused by the shape of the payload.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Io)
    }
}

impl From<serde_json::error::Category> for DecodeErrorKind {
    fn from(category: serde_json::error::Category) -> Self {
        use serde_json::error::Category;

        match category {
            Category::Syntax => Self::Syntax,
            Category::Data => Self::Data,
            Category::Eof => Self::Eof,
            Category::Io => Self::Io,
        }
    }
}

/// JSON decoding failure with the path to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{kind} error at '{path}': {message}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: String,
    message: String,
}

impl DecodeError {
    fn from_path_error(err: &serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self {
            kind: err.inner().classify().into(),
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }

    fn from_json_error(err: &serde_json::Error) -> Self {
        Self {
            kind: err.classify().into(),
            path: ".".to_string(),
            message: err.to_string(),
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Path to the field that failed, `.` for the document root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Message from the JSON parser.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Decoder turning response bodies into typed values.
///
/// The default decoder converts `snake_case` keys to `camelCase`.
///
/// # Example
///
/// ```
/// use courier_core::JsonDecoder;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User { user_name: String }
///
/// let user: User = JsonDecoder::default()
///     .decode(br#"{"user_name":"Alice"}"#)
///     .expect("decode");
/// assert_eq!(user.user_name, "Alice");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonDecoder {
    key_strategy: KeyDecodingStrategy,
}

impl JsonDecoder {
    /// Creates a decoder with the given key strategy.
    #[must_use]
    pub const fn new(key_strategy: KeyDecodingStrategy) -> Self {
        Self { key_strategy }
    }

    /// The key strategy applied to every decoded body.
    #[must_use]
    pub const fn key_strategy(&self) -> KeyDecodingStrategy {
        self.key_strategy
    }

    /// Decode `bytes` into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] carrying the path of the field that failed.
    ///
    /// With [`KeyDecodingStrategy::ConvertFromSnakeCase`], two keys that map
    /// to the same name (`user_name` and `userName`) reach the target type
    /// as duplicates: structs reject them, maps keep the last one.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let value = match self.key_strategy {
            KeyDecodingStrategy::UseDefaultKeys => {
                serde_path_to_error::deserialize(&mut deserializer)
            }
            KeyDecodingStrategy::ConvertFromSnakeCase => serde_path_to_error::deserialize(
                RenameKeys::new(&mut deserializer, snake_to_camel),
            ),
        }
        .map_err(|err| DecodeError::from_path_error(&err))?;

        deserializer
            .end()
            .map_err(|err| DecodeError::from_json_error(&err))?;
        Ok(value)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Failure to serialize a request body.
#[derive(Debug, Display, Error, From)]
#[display("failed to encode request body: {source}")]
pub struct EncodeError {
    source: serde_json::Error,
}

/// Encoder turning values into request bodies.
///
/// # Example
///
/// ```
/// use courier_core::{JsonEncoder, KeyEncodingStrategy};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct NewUser { display_name: String }
///
/// let encoder = JsonEncoder::new(KeyEncodingStrategy::ConvertToSnakeCase);
/// let body = encoder.encode(&NewUser { display_name: "Alice".into() }).expect("encode");
/// assert_eq!(body.as_ref(), br#"{"display_name":"Alice"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonEncoder {
    key_strategy: KeyEncodingStrategy,
}

impl JsonEncoder {
    /// Creates an encoder with the given key strategy.
    #[must_use]
    pub const fn new(key_strategy: KeyEncodingStrategy) -> Self {
        Self { key_strategy }
    }

    /// The key strategy applied to every encoded body.
    #[must_use]
    pub const fn key_strategy(&self) -> KeyEncodingStrategy {
        self.key_strategy
    }

    /// Serialize `value` to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if serialization fails. With
    /// [`KeyEncodingStrategy::ConvertToSnakeCase`] the value goes through
    /// [`serde_json::Value`], so integers wider than 64 bits are rejected.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, EncodeError> {
        let bytes = match self.key_strategy {
            KeyEncodingStrategy::UseDefaultKeys => serde_json::to_vec(value)?,
            KeyEncodingStrategy::ConvertToSnakeCase => {
                let value = rewrite_keys(serde_json::to_value(value)?, &camel_to_snake);
                serde_json::to_vec(&value)?
            }
        };
        Ok(Bytes::from(bytes))
    }
}
