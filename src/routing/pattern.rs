//! Path pattern compilation and matching.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::core::{Error, Result};

/// Characters a `:name` param may capture. No slashes.
const PARAM_VALUE: &str = "([A-Za-z0-9%_.~+@-]+)";

/// A route pattern as authored: a path with `:name`/`*` segments, or a raw regex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Path(String),
    Raw(String),
}

impl Pattern {
    /// A raw regular expression, used verbatim.
    pub fn raw(source: impl Into<String>) -> Self {
        Pattern::Raw(source.into())
    }

    /// Equality key for route deduplication.
    fn key(&self) -> (bool, &str) {
        match self {
            Pattern::Path(p) => (false, normalize_path(p)),
            Pattern::Raw(r) => (true, r.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Path(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Path(s)
    }
}

impl From<&String> for Pattern {
    fn from(s: &String) -> Self {
        Pattern::Path(s.clone())
    }
}

impl From<Regex> for Pattern {
    fn from(r: Regex) -> Self {
        Pattern::Raw(r.as_str().to_string())
    }
}

impl From<&Regex> for Pattern {
    fn from(r: &Regex) -> Self {
        Pattern::Raw(r.as_str().to_string())
    }
}

/// Strip one leading and one trailing `/`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// A compiled pattern with loose and strict variants.
#[derive(Clone, Debug)]
pub struct Matcher {
    pattern: Pattern,
    keys: Vec<String>,
    loose: Regex,
    strict: Regex,
}

impl Matcher {
    /// Compile a pattern. Only raw patterns can fail.
    pub fn compile(pattern: impl Into<Pattern>) -> Result<Self> {
        let pattern = pattern.into();
        let (keys, loose, strict) = match &pattern {
            Pattern::Path(path) => {
                let (keys, loose) = path_regex(normalize_path(path), true);
                let (_, strict) = path_regex(path, true);
                (keys, build(&loose, true)?, build(&strict, true)?)
            }
            Pattern::Raw(source) => (Vec::new(), build(source, true)?, build(source, false)?),
        };

        Ok(Self {
            pattern,
            keys,
            loose,
            strict,
        })
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Pattern text: the path as authored, or the raw regex source.
    pub fn as_str(&self) -> &str {
        match &self.pattern {
            Pattern::Path(p) | Pattern::Raw(p) => p,
        }
    }

    /// `:name` keys in pattern order.
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        matches!(self.pattern, Pattern::Raw(_))
    }

    /// Whether `pattern` would compile to an equivalent route.
    pub fn is_same(&self, pattern: &Pattern) -> bool {
        self.pattern.key() == pattern.key()
    }

    /// Test a path. Loose mode trims slashes off path patterns; raw patterns
    /// always see the path as-is.
    pub fn is_match(&self, path: &str, strict: bool) -> bool {
        self.regex(strict).is_match(self.subject(path, strict))
    }

    /// Extract params from a matching path.
    ///
    /// Path patterns zip `:name` keys with capture groups by position; a count
    /// mismatch or a non-matching path yields an empty map. Raw patterns
    /// report their named groups.
    pub fn params(&self, path: &str, strict: bool) -> HashMap<String, String> {
        let regex = self.regex(strict);
        let Some(caps) = regex.captures(self.subject(path, strict)) else {
            return HashMap::new();
        };

        if self.is_raw() {
            return regex
                .capture_names()
                .flatten()
                .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
                .collect();
        }

        if caps.len() - 1 != self.keys.len() {
            return HashMap::new();
        }
        self.keys
            .iter()
            .zip(caps.iter().skip(1))
            .filter_map(|(key, value)| value.map(|v| (key.clone(), v.as_str().to_string())))
            .collect()
    }

    #[inline]
    fn regex(&self, strict: bool) -> &Regex {
        if strict {
            &self.strict
        } else {
            &self.loose
        }
    }

    #[inline]
    fn subject<'p>(&self, path: &'p str, strict: bool) -> &'p str {
        if strict || self.is_raw() {
            path
        } else {
            normalize_path(path)
        }
    }
}

/// A mount-point prefix, matched against the start of a path.
///
/// Loose matching normalizes the prefix like a [`Matcher`] does, so the
/// leading slash is optional and a trailing slash is ignored. Strict matching
/// takes the prefix as written: a leading slash must be present in the path,
/// and a trailing slash requires the path to continue past it. Both are
/// case-insensitive.
#[derive(Clone, Debug)]
pub(crate) struct Prefix {
    source: String,
    keys: Vec<String>,
    loose: Regex,
    strict: Regex,
}

impl Prefix {
    /// `None` for an empty or `/` prefix, which mounts at the root.
    pub(crate) fn compile(prefix: &str) -> Result<Option<Self>> {
        let normalized = normalize_path(prefix);
        if normalized.is_empty() {
            return Ok(None);
        }

        let (keys, body) = path_regex(normalized, false);
        let loose = build(&format!("^/?{}(/|$)", body), true)?;

        let strict = match prefix.strip_suffix('/') {
            Some(open) => format!("^{}(/)", path_regex(open, false).1),
            None => format!("^{}(/|$)", path_regex(prefix, false).1),
        };
        let strict = build(&strict, true)?;

        Ok(Some(Self {
            source: normalized.to_string(),
            keys,
            loose,
            strict,
        }))
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.source
    }

    /// Bytes consumed from the start of `path`, plus the prefix params.
    pub(crate) fn consume(
        &self,
        path: &str,
        strict: bool,
    ) -> Option<(usize, HashMap<String, String>)> {
        let regex = if strict { &self.strict } else { &self.loose };
        let caps = regex.captures(path)?;
        let boundary = caps.get(caps.len() - 1)?.start();
        let params = self
            .keys
            .iter()
            .zip(caps.iter().skip(1))
            .filter_map(|(key, value)| value.map(|v| (key.clone(), v.as_str().to_string())))
            .collect();
        Some((boundary, params))
    }
}

/// Test `path` against a path pattern.
pub fn match_path(path: &str, pattern: &str, strict: bool) -> bool {
    Matcher::compile(pattern)
        .map(|m| m.is_match(path, strict))
        .unwrap_or(false)
}

/// Extract `:name` params from `path` using `pattern`; `{}` when nothing matches.
pub fn extract_params(path: &str, pattern: &str) -> HashMap<String, String> {
    Matcher::compile(pattern)
        .map(|m| m.params(path, false))
        .unwrap_or_default()
}

/// Translate a path pattern into regex source and its param keys.
fn path_regex(pattern: &str, anchored: bool) -> (Vec<String>, String) {
    let mut keys = Vec::new();
    let mut out = String::with_capacity(pattern.len() + 16);
    if anchored {
        out.push('^');
    }

    for (i, segment) in pattern.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        if segment == "*" {
            out.push_str(".*");
            continue;
        }
        if let Some(rest) = segment.strip_prefix(':') {
            let name_len = param_name_len(rest);
            if name_len > 0 {
                keys.push(rest[..name_len].to_string());
                out.push_str(PARAM_VALUE);
                out.push_str(&regex::escape(&rest[name_len..]));
                continue;
            }
        }
        out.push_str(&regex::escape(segment));
    }

    if anchored {
        out.push('$');
    }
    (keys, out)
}

/// Length of a leading `[A-Za-z][A-Za-z0-9_]*` name.
fn param_name_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() => {
            1 + bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count()
        }
        _ => 0,
    }
}

fn build(source: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| Error::InvalidPattern {
            pattern: source.to_string(),
            message: e.to_string(),
        })
}
