//! Logging configuration.

use super::parse::env_or;
use super::ConfigError;

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: unflare=debug,access=info
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            filter: Self::resolve_log_filter()?,
            service_name: env_or("SERVICE_NAME", "unflare"),
        })
    }

    /// Resolve log filter from environment.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default (info)
    fn resolve_log_filter() -> Result<String, ConfigError> {
        // 1. LOG_LEVEL (simple: debug, info, warn, error)
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            let level = level.to_lowercase();
            return match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    Ok(format!("unflare={},access={}", level, level))
                }
                _ => Err(ConfigError::Invalid {
                    key: "LOG_LEVEL".into(),
                    message: format!(
                        "'{}', expected: trace, debug, info, warn, error",
                        level
                    ),
                }),
            };
        }

        // 2. RUST_LOG (full tracing filter syntax)
        if let Ok(filter) = std::env::var("RUST_LOG") {
            return Ok(filter);
        }

        // 3. Default
        Ok("unflare=info,access=info".to_string())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "unflare=info,access=info".to_string(),
            service_name: "unflare".to_string(),
        }
    }
}
