//! Inbound request view used by handlers.

use std::any::Any;
use std::collections::HashMap;

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Uri};

use super::{Error, Result, Verb};
use crate::parse::body::{parse_body, Body};
use crate::parse::cookie::parse_cookies;
use crate::parse::query::{parse_query, QueryMap};

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
    pub static COOKIE: HeaderName = header::COOKIE;
    pub static HOST: HeaderName = header::HOST;
    pub static USER_AGENT: HeaderName = header::USER_AGENT;
}

/// Parsed, read-mostly view of one inbound request.
///
/// Created once per request by [`App::fetch`](crate::App::fetch). Route
/// params are merged into it by every route and mounted router the request
/// passes through.
pub struct Request {
    method: Verb,
    uri: Uri,
    headers: HeaderMap,
    host: String,
    query: QueryMap,
    params: HashMap<String, String>,
    cookies: HashMap<String, String>,
    body: Body,
    strict: bool,
    /// Byte offset into the path consumed by prefix-mounted routers.
    base: usize,
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Request {
    /// Create a request without a body.
    pub fn new(method: Verb, uri: Uri, headers: HeaderMap) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        let cookies = headers
            .get(&header_names::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(parse_cookies)
            .unwrap_or_default();
        let host = uri
            .host()
            .map(str::to_string)
            .or_else(|| {
                headers
                    .get(&header_names::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(|h| h.split(':').next().unwrap_or(h).to_string())
            })
            .unwrap_or_default();

        Self {
            method,
            uri,
            headers,
            host,
            query,
            params: HashMap::new(),
            cookies,
            body: Body::None,
            strict: false,
            base: 0,
            values: HashMap::new(),
        }
    }

    /// Adapt a platform request, parsing its body eagerly.
    ///
    /// Fails on extension methods and on bodies that cannot be decoded.
    pub fn from_http(req: http::Request<Bytes>, strict: bool) -> Result<Self> {
        let (parts, raw) = req.into_parts();
        let method = Verb::from_method(&parts.method).ok_or_else(|| {
            Error::InvalidRequest(format!("unsupported method: {}", parts.method))
        })?;
        let body = parse_body(&parts.headers, &raw)?;

        let mut request = Self::new(method, parts.uri, parts.headers);
        request.body = body;
        request.strict = strict;
        Ok(request)
    }

    /// Shorthand for tests and adapters: a request with no headers.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let uri: Uri = uri
            .parse()
            .map_err(|e: http::uri::InvalidUri| Error::InvalidRequest(e.to_string()))?;
        Ok(Self::new(Verb::Get, uri, HeaderMap::new()))
    }

    /// Builder-style method override.
    pub fn with_method(mut self, method: Verb) -> Self {
        self.method = method;
        self
    }

    /// Builder-style strict-routing flag.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builder-style body override.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    #[inline]
    pub fn method(&self) -> Verb {
        self.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Host from the URI authority, falling back to the `Host` header.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full request path, not percent-decoded.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The path relative to the innermost mounted router.
    #[inline]
    pub fn routing_path(&self) -> &str {
        self.uri.path().get(self.base..).unwrap_or("")
    }

    /// The part of the path consumed by mounted routers.
    #[inline]
    pub fn base_path(&self) -> &str {
        self.uri.path().get(..self.base).unwrap_or("")
    }

    #[inline]
    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    /// A single query value; `None` for a missing key or an empty value.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).and_then(|v| v.as_deref())
    }

    #[inline]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// A single route param.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Merge params into the existing set; later values win per key.
    pub fn merge_params(&mut self, params: HashMap<String, String>) {
        self.params.extend(params);
    }

    #[inline]
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Whether routing is strict (no slash normalization, case-sensitive raw patterns).
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(&header_names::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .get(&header_names::USER_AGENT)
            .and_then(|v| v.to_str().ok())
    }

    /// Store a request-scoped value for later handlers.
    #[inline]
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    #[inline]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref())
    }

    #[inline]
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut())
    }

    #[inline]
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Consume `len` more bytes of the routing path; returns the previous base.
    pub(crate) fn enter_mount(&mut self, len: usize) -> usize {
        let previous = self.base;
        self.base = (self.base + len).min(self.uri.path().len());
        previous
    }

    pub(crate) fn leave_mount(&mut self, previous: usize) {
        self.base = previous;
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
