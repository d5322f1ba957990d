//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse environment variable as boolean.
///
/// Accepts "1", "true", "yes", "on" and "0", "false", "no", "off"
/// (case-insensitive). Missing or empty means `default`.
pub fn env_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = env_opt(key) else {
        return Ok(default);
    };
    parse_bool(&value).ok_or_else(|| ConfigError::Parse {
        key: key.into(),
        value,
        reason: "expected a boolean (1/0, true/false, yes/no, on/off)".into(),
    })
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
