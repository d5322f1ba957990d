//! Configuration module for unflare.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use unflare::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Strict routing: {}", config.app.strict_routing);
//! ```

mod app;
mod error;
mod logging;
mod parse;

pub use app::{AppConfig, DEFAULT_NOT_FOUND_BODY};
pub use error::ConfigError;
pub use logging::LoggingConfig;

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Routing and response configuration.
    pub app: AppConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Service: {}", self.logging.service_name);
        info!("  Log filter: {}", self.logging.filter);
        info!(
            "  Routing: {}",
            if self.app.strict_routing { "strict" } else { "loose" }
        );
        info!(
            "  Not found: {} {:?}",
            self.app.not_found_status.as_u16(),
            self.app.not_found_body
        );

        if self.app.access_log {
            info!("  Access log: enabled");
        }
    }
}
