//! Request body parsing by content type.

use std::collections::HashMap;
use std::sync::LazyLock;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::HeaderMap;
use regex::Regex;

use super::content_type::type_is;
use super::fast_percent_decode;
use crate::core::{Error, Result};

static TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^text/").unwrap());
static JSON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)application/json").unwrap());
static URLENCODED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)urlencoded").unwrap());

/// A parsed request body.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    /// No body, or a body without a usable `Content-Length`.
    #[default]
    None,
    /// `text/*` content decoded as UTF-8.
    Text(String),
    /// `application/json` content.
    Json(serde_json::Value),
    /// `*urlencoded` content.
    Form(HashMap<String, String>),
    /// Anything else, untouched.
    Bytes(Bytes),
}

impl Body {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Body::None)
    }

    /// Text content, if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON content, if this is a JSON body.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Form fields, if this is an urlencoded body.
    pub fn as_form(&self) -> Option<&HashMap<String, String>> {
        match self {
            Body::Form(f) => Some(f),
            _ => None,
        }
    }

    /// Raw bytes, if the content type was not recognized.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Look up a field in a JSON object or form body.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Body::Json(v) => v.get(name).and_then(|f| f.as_str()),
            Body::Form(f) => f.get(name).map(String::as_str),
            _ => None,
        }
    }
}

/// Parse a request body according to its `Content-Length` and `Content-Type`.
///
/// Without a valid `Content-Length` the body is [`Body::None`]. Otherwise at
/// most that many bytes are read. A malformed JSON body is an
/// [`Error::InvalidRequest`].
pub fn parse_body(headers: &HeaderMap, raw: &Bytes) -> Result<Body> {
    let Some(length) = headers.get(CONTENT_LENGTH) else {
        if !raw.is_empty() {
            tracing::warn!("request body ignored: missing Content-Length");
        }
        return Ok(Body::None);
    };

    let Some(length) = length.to_str().ok().and_then(|v| v.trim().parse::<usize>().ok()) else {
        tracing::warn!(content_length = ?length, "request body ignored: invalid Content-Length");
        return Ok(Body::None);
    };

    if raw.len() < length {
        tracing::debug!(
            expected = length,
            received = raw.len(),
            "request body shorter than Content-Length"
        );
    }
    let data = raw.slice(..length.min(raw.len()));

    if type_is(headers, &[&TEXT]) {
        return Ok(Body::Text(String::from_utf8_lossy(&data).into_owned()));
    }

    if type_is(headers, &[&JSON]) {
        let text = String::from_utf8_lossy(&data);
        return serde_json::from_str(&text)
            .map(Body::Json)
            .map_err(|e| Error::InvalidRequest(format!("malformed JSON body: {}", e)));
    }

    if type_is(headers, &[&URLENCODED]) {
        return Ok(Body::Form(parse_form(&String::from_utf8_lossy(&data))));
    }

    Ok(Body::Bytes(data))
}

/// Parse `application/x-www-form-urlencoded` content.
///
/// `+` decodes to a space. When a key repeats, the first occurrence wins.
pub fn parse_form(input: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for pair in input.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, ""),
        };

        let key = fast_percent_decode(&key.replace('+', " ")).into_owned();
        if key.is_empty() || fields.contains_key(&key) {
            continue;
        }
        let value = fast_percent_decode(&value.replace('+', " ")).into_owned();
        fields.insert(key, value);
    }

    fields
}
