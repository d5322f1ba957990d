//! Query string parsing.

use std::collections::HashMap;

use super::fast_percent_decode;

/// Parsed query parameters. A key without a value maps to `None`.
pub type QueryMap = HashMap<String, Option<String>>;

/// Parse a full URL or a bare query string into key/value pairs.
///
/// This does not validate the input. Everything before the first `?` is
/// ignored when present, and so is a `#fragment`. Both keys and values are
/// percent-decoded; `key` and `key=` yield `None`. A repeated key keeps its
/// last value.
pub fn parse_query(input: &str) -> QueryMap {
    let query = match input.find('?') {
        Some(pos) => &input[pos + 1..],
        None if input.contains("://") => "",
        None => input,
    };
    let query = match query.find('#') {
        Some(pos) => &query[..pos],
        None => query,
    };

    let mut params = HashMap::with_capacity((query.matches('&').count() + 1).min(16));

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, ""),
        };

        if key.is_empty() {
            continue;
        }

        let value = if value.is_empty() {
            None
        } else {
            Some(fast_percent_decode(value).into_owned())
        };
        params.insert(fast_percent_decode(key).into_owned(), value);
    }

    params
}
