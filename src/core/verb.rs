//! HTTP verbs known to the router.

use std::fmt;
use std::str::FromStr;

/// HTTP verb a handler is registered under.
///
/// `All` is a registration-side wildcard and never appears on a request
/// parsed from a real method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
    All,
}

impl Verb {
    /// Every concrete verb, in registration-method order.
    pub const CONCRETE: [Verb; 9] = [
        Verb::Get,
        Verb::Head,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Connect,
        Verb::Options,
        Verb::Trace,
    ];

    /// Upper-case wire name.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Connect => "CONNECT",
            Verb::Options => "OPTIONS",
            Verb::Trace => "TRACE",
            Verb::All => "ALL",
        }
    }

    /// Whether a handler tagged with `self` serves a request made with `request`.
    #[inline]
    pub fn matches(self, request: Verb) -> bool {
        self == Verb::All || self == request
    }

    /// Convert from an `http::Method`. Extension methods have no verb.
    pub fn from_method(method: &http::Method) -> Option<Self> {
        match method.as_str().parse() {
            Ok(Verb::All) | Err(_) => None,
            Ok(verb) => Some(verb),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown verb string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerb(pub String);

impl fmt::Display for UnknownVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP verb: {}", self.0)
    }
}

impl std::error::Error for UnknownVerb {}

impl FromStr for Verb {
    type Err = UnknownVerb;

    /// Case-insensitive: `"get"` and `"GET"` are both `Verb::Get`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = match s.to_ascii_uppercase().as_str() {
            "GET" => Verb::Get,
            "HEAD" => Verb::Head,
            "POST" => Verb::Post,
            "PUT" => Verb::Put,
            "PATCH" => Verb::Patch,
            "DELETE" => Verb::Delete,
            "CONNECT" => Verb::Connect,
            "OPTIONS" => Verb::Options,
            "TRACE" => Verb::Trace,
            "ALL" => Verb::All,
            _ => return Err(UnknownVerb(s.to_string())),
        };
        Ok(verb)
    }
}
