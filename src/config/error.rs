//! Configuration error types.

use std::fmt;

/// A configuration variable that could not be applied.
#[derive(Debug)]
pub enum ConfigError {
    /// The variable is set but does not parse as the expected type.
    Parse {
        key: String,
        value: String,
        reason: String,
    },
    /// The variable parsed but the router cannot use it.
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Name of the offending variable.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::Parse { key, .. } | ConfigError::Invalid { key, .. } => key,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { key, value, reason } => {
                write!(f, "{}={:?} does not parse: {}", key, value, reason)
            }
            ConfigError::Invalid { key, message } => write!(f, "{} rejected: {}", key, message),
        }
    }
}

impl std::error::Error for ConfigError {}
