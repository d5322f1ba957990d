//! Cookie parsing and `Set-Cookie` serialization.

use std::collections::HashMap;
use std::fmt::Write;
use std::time::SystemTime;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use time::macros::format_description;
use time::OffsetDateTime;

use super::fast_percent_decode;
use crate::core::{Error, Result};

/// Characters `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `SameSite` attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// `Priority` attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Attributes attached to a cookie when it is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// `Domain` attribute.
    pub domain: Option<String>,
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Expires` attribute. Unset means a session cookie.
    pub expires: Option<SystemTime>,
    /// `Max-Age` attribute in seconds.
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub partitioned: bool,
    pub priority: Option<Priority>,
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn expires(mut self, at: SystemTime) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn max_age(mut self, secs: i64) -> Self {
        self.max_age = Some(secs);
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn partitioned(mut self) -> Self {
        self.partitioned = true;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

/// Parse a `Cookie` header into a flat name/value map.
///
/// Values are percent-decoded and stripped of surrounding double quotes. When
/// a name repeats, the first occurrence wins.
pub fn parse_cookies(cookie_header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::with_capacity((cookie_header.matches(';').count() + 1).min(16));

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if cookie.is_empty() {
            continue;
        }

        let (name, value) = match cookie.find('=') {
            Some(pos) => (cookie[..pos].trim(), cookie[pos + 1..].trim()),
            None => continue,
        };

        if name.is_empty() || cookies.contains_key(name) {
            continue;
        }

        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        cookies.insert(name.to_string(), fast_percent_decode(value).into_owned());
    }

    cookies
}

/// Serialize a cookie into a `Set-Cookie` header value.
///
/// The value is encoded like `encodeURIComponent`. Attributes are emitted in
/// a fixed order: `Max-Age`, `Domain`, `Path`, `Expires`, `HttpOnly`,
/// `Secure`, `Partitioned`, `Priority`, `SameSite`.
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> Result<String> {
    if !is_token(name) {
        return Err(Error::InvalidCookie(format!("argument name is invalid: {}", name)));
    }

    let mut out = String::with_capacity(name.len() + value.len() + 16);
    out.push_str(name);
    out.push('=');
    out.extend(utf8_percent_encode(value, COMPONENT));

    if let Some(max_age) = options.max_age {
        let _ = write!(out, "; Max-Age={}", max_age);
    }

    if let Some(ref domain) = options.domain {
        if !is_field_content(domain) {
            return Err(Error::InvalidCookie(format!("option domain is invalid: {}", domain)));
        }
        out.push_str("; Domain=");
        out.push_str(domain);
    }

    if let Some(ref path) = options.path {
        if !is_field_content(path) {
            return Err(Error::InvalidCookie(format!("option path is invalid: {}", path)));
        }
        out.push_str("; Path=");
        out.push_str(path);
    }

    if let Some(expires) = options.expires {
        out.push_str("; Expires=");
        out.push_str(&http_date(expires)?);
    }

    if options.http_only {
        out.push_str("; HttpOnly");
    }

    if options.secure {
        out.push_str("; Secure");
    }

    if options.partitioned {
        out.push_str("; Partitioned");
    }

    if let Some(priority) = options.priority {
        out.push_str("; Priority=");
        out.push_str(priority.as_str());
    }

    if let Some(same_site) = options.same_site {
        out.push_str("; SameSite=");
        out.push_str(same_site.as_str());
    }

    Ok(out)
}

/// Format a timestamp as an IMF-fixdate, e.g. `Wed, 21 Oct 2015 07:28:00 GMT`.
pub fn http_date(at: SystemTime) -> Result<String> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    OffsetDateTime::from(at)
        .format(&format)
        .map_err(|e| Error::InvalidCookie(format!("option expires is invalid: {}", e)))
}

/// RFC 7230 token: visible ASCII minus separators.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

/// Attribute values may hold anything but control characters and `;`.
fn is_field_content(s: &str) -> bool {
    s.chars().all(|c| c != ';' && (c == '\t' || !c.is_control()))
}
