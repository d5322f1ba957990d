//! Content type checks.

use http::header::CONTENT_TYPE;
use http::HeaderMap;
use regex::Regex;

/// Check whether the request's `Content-Type` matches any of `types`.
///
/// A request without a content type matches nothing.
pub fn type_is(headers: &HeaderMap, types: &[&Regex]) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    types.iter().any(|t| t.is_match(content_type))
}
