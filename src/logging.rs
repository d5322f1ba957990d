//! Unified JSON logging with custom format.
//!
//! Log format:
//! ```json
//! {"ts":"2024-12-28T15:04:05.123Z","level":"info","type":"app","msg":"route added","ctx":{"service":"unflare"},"data":{}}
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target used by per-request access events.
pub const ACCESS_TARGET: &str = "access";

/// Log entry with unified structure.
#[derive(Serialize)]
struct LogEntry<'a> {
    /// ISO 8601 timestamp with milliseconds, UTC
    ts: &'a str,
    /// Log level: debug, info, warn, error
    level: &'a str,
    /// Log type: app, access, error
    #[serde(rename = "type")]
    log_type: &'a str,
    /// Short human-readable message
    msg: &'a str,
    ctx: LogContext<'a>,
    /// Type-specific data
    data: &'a HashMap<String, serde_json::Value>,
}

/// Log context.
#[derive(Serialize)]
struct LogContext<'a> {
    service: &'a str,
    /// Request ID for correlation
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

/// Custom JSON formatter for tracing.
pub struct JsonFormatter {
    service_name: String,
}

impl JsonFormatter {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let level = match *meta.level() {
            Level::TRACE => "debug",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };

        // Determine log type from target
        let log_type = if meta.target() == ACCESS_TARGET {
            "access"
        } else if *meta.level() == Level::ERROR {
            "error"
        } else {
            "app"
        };

        // Collect fields
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let ts = timestamp();

        // For access logs, build "METHOD /path STATUS"
        let msg = if log_type == "access" {
            let method = visitor
                .fields
                .get("method")
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            let path = visitor
                .fields
                .get("path")
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            let status = visitor
                .fields
                .get("status")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            format!("{} {} {}", method, path, status)
        } else {
            visitor.message.take().unwrap_or_default()
        };

        let request_id = visitor.fields.remove("request_id");
        let entry = LogEntry {
            ts: &ts,
            level,
            log_type,
            msg: &msg,
            ctx: LogContext {
                service: &self.service_name,
                request_id: request_id.as_ref().and_then(|v| v.as_str()),
            },
            data: &visitor.fields,
        };

        writeln!(
            writer,
            "{}",
            serde_json::to_string(&entry).unwrap_or_default()
        )
    }
}

/// Current UTC time, e.g. `2024-12-28T15:04:05.123Z`.
fn timestamp() -> String {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    OffsetDateTime::now_utc().format(&format).unwrap_or_default()
}

/// Field visitor for collecting tracing fields.
struct FieldVisitor {
    message: Option<String>,
    fields: HashMap<String, serde_json::Value>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: HashMap::new(),
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value).trim_matches('"').to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }
}

/// Error installing the global subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// The configured filter is not valid `EnvFilter` syntax.
    Filter(String),
    /// A global subscriber is already set.
    Init(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::Filter(msg) => write!(f, "invalid log filter: {}", msg),
            LoggingError::Init(msg) => write!(f, "failed to install subscriber: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install the JSON formatter as the global subscriber.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_new(&config.filter).map_err(|e| LoggingError::Filter(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(JsonFormatter::new(config.service_name.clone())),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
