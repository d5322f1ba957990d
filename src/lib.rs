//! unflare - Express-style routing and middleware for edge request handlers.
//!
//! This crate takes a platform request (`http::Request<Bytes>`), runs it
//! through an ordered tree of routers, routes and handlers, and produces a
//! platform response. It does not own a socket or a runtime; the host calls
//! [`App::fetch`] for each request.
//!
//! # Features
//!
//! - **Verb routing**: `:name` params, `*` wildcards and raw regex patterns
//! - **Middleware chain**: explicit continuation through [`Next`]
//! - **Error handlers**: errors skip ordinary handlers until one resolves them
//! - **Nested routers**: mount under a prefix, with prefix params
//! - **Request parsing**: query strings, cookies, JSON/form/text bodies
//! - **Access logging**: structured JSON logging with tracing
//!
//! # Example
//!
//! ```rust,ignore
//! use unflare::{App, Handler};
//!
//! let mut app = App::new();
//! app.get("/hello/:name", Handler::route_sync(|req, res| {
//!     res.send(format!("Hello, {}!", req.param("name").unwrap_or("world")));
//!     Ok(())
//! }))?;
//!
//! let response = app.fetch(request).await;
//! ```

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod parse;
pub mod routing;

// Re-exports for convenience
pub use app::App;
pub use config::{AppConfig, Config, ConfigError, LoggingConfig};
pub use crate::core::{Error, Request, Responder, ResponseBody, Result, StatusText, Verb};
pub use parse::body::Body;
pub use parse::cookie::{CookieOptions, Priority, SameSite};
pub use routing::{BoxFuture, Handler, IntoHandlers, Next, Pattern, Route, Router};
