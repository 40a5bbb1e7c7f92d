//! URL construction from a base URL, an endpoint and query parameters.

use std::collections::HashMap;

use url::Url;

use crate::Result;

/// Resolve `endpoint` against `base` and attach `query_parameters`.
///
/// Resolution follows RFC 3986 §5, so an endpoint starting with `/` replaces
/// the base path while a bare segment replaces only its last segment. When
/// parameters are present and non-empty they replace the query of the
/// resolved URL, one `name=value` pair per entry, percent-encoded by the
/// `application/x-www-form-urlencoded` serializer. Otherwise the resolved URL
/// is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if resolution fails.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use courier_core::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com/v1/").unwrap();
/// let query = HashMap::from([("q".to_string(), "rust lang".to_string())]);
///
/// let url = resolve_url(&base, "search", Some(&query)).unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/v1/search?q=rust+lang");
/// ```
pub fn resolve_url(
    base: &Url,
    endpoint: &str,
    query_parameters: Option<&HashMap<String, String>>,
) -> Result<Url> {
    let mut url = base.join(endpoint)?;

    if let Some(parameters) = query_parameters.filter(|parameters| !parameters.is_empty()) {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (name, value) in parameters {
            query.append_pair(name, value);
        }
    }

    Ok(url)
}
