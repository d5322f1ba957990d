//! Application configuration.

use http::StatusCode;

use super::parse::{env_bool, env_opt, env_parse};
use super::ConfigError;

/// Body and status text of the default not-found response.
pub const DEFAULT_NOT_FOUND_BODY: &str = "Page Not Found!";

/// Application configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Match paths without slash trimming; raw patterns become case-sensitive.
    pub strict_routing: bool,
    /// Emit one `access` event per request.
    pub access_log: bool,
    /// Status of the default not-found response.
    pub not_found_status: StatusCode,
    /// Body of the default not-found response.
    pub not_found_body: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let status: u16 = env_parse("NOT_FOUND_STATUS", 404)?;
        let not_found_status = StatusCode::from_u16(status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .ok_or_else(|| ConfigError::Invalid {
                key: "NOT_FOUND_STATUS".into(),
                message: format!("{} is not a 4xx or 5xx status", status),
            })?;

        Ok(Self {
            strict_routing: env_bool("STRICT_ROUTING", false)?,
            access_log: env_bool("ACCESS_LOG", false)?,
            not_found_status,
            not_found_body: env_opt("NOT_FOUND_BODY")
                .unwrap_or_else(|| DEFAULT_NOT_FOUND_BODY.to_string()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strict_routing: false,
            access_log: false,
            not_found_status: StatusCode::NOT_FOUND,
            not_found_body: DEFAULT_NOT_FOUND_BODY.to_string(),
        }
    }
}
