//! Response accumulator filled in by handlers.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderValue, StatusCode};
use serde::Serialize;

use super::Result;
use crate::parse::cookie::{self, CookieOptions};

/// Common header names, spelled the way they are written back to the platform.
mod header_names {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const LOCATION: &str = "Location";
    pub const SET_COOKIE: &str = "Set-Cookie";
}

/// Pre-allocated content type values.
mod content_types {
    pub const APPLICATION_JSON: &str = "application/json; charset=UTF-8";
}

/// Reason phrase attached to a materialized response.
///
/// `http::Response` has no reason-phrase field, so it travels as an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusText(pub String);

/// Accumulated response body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Bytes(Bytes),
}

impl ResponseBody {
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Empty => true,
            ResponseBody::Text(s) => s.is_empty(),
            ResponseBody::Bytes(b) => b.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            _ => None,
        }
    }

    fn into_bytes(self) -> Bytes {
        match self {
            ResponseBody::Empty => Bytes::new(),
            ResponseBody::Text(s) => Bytes::from(s),
            ResponseBody::Bytes(b) => b,
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(s: &str) -> Self {
        ResponseBody::Text(s.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        ResponseBody::Text(s)
    }
}

impl From<Bytes> for ResponseBody {
    fn from(b: Bytes) -> Self {
        ResponseBody::Bytes(b)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(b: Vec<u8>) -> Self {
        ResponseBody::Bytes(Bytes::from(b))
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        ResponseBody::Empty
    }
}

/// Mutable accumulator for one outgoing response.
///
/// Once [`is_done`](Self::is_done) is true, further `send`/`json`/`write`/`end`
/// calls are ignored with a warning. Headers stay writable.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
#[derive(Debug, Default)]
pub struct Responder {
    done: bool,
    status: Option<StatusCode>,
    status_text: Option<String>,
    /// Insertion-ordered; keys are compared exactly on write.
    headers: Vec<(String, String)>,
    body: ResponseBody,
    host: String,
}

impl Responder {
    /// Create an empty responder for a request made to `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    // Getters

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[inline]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    #[inline]
    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    #[inline]
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// All headers in insertion order.
    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    // Modifiers

    /// Set the status code. Codes outside 100..=999 are ignored.
    pub fn status(&mut self, code: u16) -> &mut Self {
        match StatusCode::from_u16(code) {
            Ok(status) => self.status = Some(status),
            Err(_) => tracing::warn!(code, "ignoring invalid status code"),
        }
        self
    }

    /// Set the status code and reason phrase.
    pub fn status_with_text(&mut self, code: u16, text: impl Into<String>) -> &mut Self {
        self.status(code);
        let text = text.into();
        if !text.is_empty() {
            self.status_text = Some(text);
        }
        self
    }

    /// Set a header, replacing an existing entry with the exact same key.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Remove every header matching `name` (case-insensitive).
    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self
    }

    /// Set the `Content-Type` header verbatim.
    pub fn content_type(&mut self, value: impl Into<String>) -> &mut Self {
        self.set_header(header_names::CONTENT_TYPE, value)
    }

    /// Set `Content-Type` from a file extension (`"html"`, `".png"`) or a full MIME type.
    pub fn set_type(&mut self, ext_or_mime: &str) -> &mut Self {
        let mime = if ext_or_mime.contains('/') {
            ext_or_mime.to_string()
        } else {
            mime_guess::from_ext(ext_or_mime.trim_start_matches('.'))
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        };
        self.content_type(mime)
    }

    /// Set the body and mark the response done.
    pub fn send(&mut self, body: impl Into<ResponseBody>) {
        if self.done {
            tracing::warn!("can not change response once sent");
            return;
        }
        self.body = body.into();
        self.done = true;
    }

    /// Serialize `value` as the JSON body and mark the response done.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        if self.done {
            tracing::warn!("can not change response once sent");
            return Ok(());
        }
        let body = serde_json::to_string(value)?;
        self.content_type(content_types::APPLICATION_JSON);
        self.send(body);
        Ok(())
    }

    /// Append to a text body without finishing the response.
    pub fn write(&mut self, content: &str) {
        if self.done {
            tracing::warn!("can not change response body once send() or end() is called");
            return;
        }
        match self.body {
            ResponseBody::Text(ref mut text) => text.push_str(content),
            _ => self.body = ResponseBody::Text(content.to_string()),
        }
    }

    /// [`write`](Self::write) followed by a newline.
    pub fn write_line(&mut self, content: &str) {
        if self.done {
            tracing::warn!("can not change response body once send() or end() is called");
            return;
        }
        self.write(content);
        self.write("\n");
    }

    /// Mark the response done with whatever body has been written.
    pub fn end(&mut self) {
        if self.done {
            tracing::warn!("end() or send() was already called");
            return;
        }
        self.done = true;
    }

    /// Add a cookie to the single `Set-Cookie` header, comma-joined with earlier ones.
    ///
    /// With options but no `domain`, the request host is used.
    pub fn cookie(
        &mut self,
        name: &str,
        value: &str,
        options: Option<CookieOptions>,
    ) -> Result<&mut Self> {
        let token = match options {
            Some(mut options) => {
                if options.domain.is_none() && !self.host.is_empty() {
                    options.domain = Some(self.host.clone());
                }
                cookie::serialize(name, value, &options)?
            }
            None => cookie::serialize(name, value, &CookieOptions::default())?,
        };

        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key == header_names::SET_COOKIE)
        {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&token);
            }
            None => self.headers.push((header_names::SET_COOKIE.to_string(), token)),
        }
        Ok(self)
    }

    /// Expire a cookie on the client.
    pub fn clear_cookie(&mut self, name: &str, options: Option<CookieOptions>) -> Result<&mut Self> {
        let mut options = options.unwrap_or_default();
        options.expires = Some(std::time::UNIX_EPOCH);
        options.max_age = None;
        self.cookie(name, "", Some(options))
    }

    /// Redirect with `302 Found`.
    pub fn redirect(&mut self, location: &str) {
        self.redirect_with_status(StatusCode::FOUND.as_u16(), location);
    }

    /// Redirect with the given status and finish the response.
    pub fn redirect_with_status(&mut self, code: u16, location: &str) {
        if self.done {
            tracing::warn!("can not redirect once the response was sent");
            return;
        }
        self.status(code);
        self.set_header(header_names::LOCATION, location);
        self.send(());
    }

    /// Materialize into a platform response.
    ///
    /// Unset status means 200. Headers that are not valid HTTP are skipped.
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut res = http::Response::new(self.body.into_bytes());
        *res.status_mut() = self.status.unwrap_or(StatusCode::OK);

        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "skipping invalid response header"),
            }
        }

        if let Some(text) = self.status_text {
            res.extensions_mut().insert(StatusText(text));
        }
        res
    }
}

/// Shorthand used by the not-found and error fallbacks.
pub(crate) fn plain_text(
    code: StatusCode,
    status_text: &str,
    body: impl Into<Bytes>,
) -> http::Response<Bytes> {
    let mut res = http::Response::new(body.into());
    *res.status_mut() = code;
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res.extensions_mut().insert(StatusText(status_text.to_string()));
    res
}
