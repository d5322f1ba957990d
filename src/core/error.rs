//! Core error types.

use std::fmt;

/// Errors raised while registering routes or dispatching a request.
#[derive(Debug)]
pub enum Error {
    /// A registration call was given no usable handlers.
    InvalidArguments(String),

    /// A raw route pattern failed to compile.
    InvalidPattern { pattern: String, message: String },

    /// The inbound request could not be adapted.
    InvalidRequest(String),

    /// A cookie name or attribute cannot be serialized.
    InvalidCookie(String),

    /// JSON encoding or decoding failed.
    Json(serde_json::Error),

    /// HTTP error.
    Http(http::Error),

    /// A handler panicked while running.
    Panic(String),

    /// Error returned by user code.
    Handler(Box<dyn std::error::Error + Send + Sync>),

    /// Error raised from a plain message; displays as `Error: <message>`.
    Custom(String),
}

impl Error {
    /// Wrap any error type raised by a handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Handler(Box::new(err))
    }

    /// Try to view the wrapped handler error as a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Error::Handler(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            Error::InvalidPattern { pattern, message } => {
                write!(f, "invalid route pattern '{}': {}", pattern, message)
            }
            Error::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            Error::InvalidCookie(msg) => write!(f, "invalid cookie: {}", msg),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Panic(msg) => write!(f, "handler panicked: {}", msg),
            Error::Handler(e) => write!(f, "{}", e),
            Error::Custom(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Http(e) => Some(e),
            Error::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Custom(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
