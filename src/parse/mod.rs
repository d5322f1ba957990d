//! Parsers for the parts of a request the router does not interpret itself.
//!
//! - [`query`] - query strings into key/value maps
//! - [`cookie`] - `Cookie` headers and `Set-Cookie` serialization
//! - [`body`] - request bodies by content type
//! - [`content_type`] - content type checks

pub mod body;
pub mod content_type;
pub mod cookie;
pub mod query;

use std::borrow::Cow;

/// Percent decode, returning the input untouched when nothing is encoded.
///
/// `+` is left as-is, matching `decodeURIComponent`.
#[inline]
pub fn fast_percent_decode(s: &str) -> Cow<'_, str> {
    if s.contains('%') {
        percent_encoding::percent_decode_str(s).decode_utf8_lossy()
    } else {
        Cow::Borrowed(s)
    }
}
