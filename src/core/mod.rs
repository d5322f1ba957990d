//! Core types for request/response handling.
//!
//! This module provides the fundamental types passed through every handler
//! chain:
//!
//! - [`Request`] - parsed view of the inbound request
//! - [`Responder`] - response accumulator with at-most-once completion
//! - [`Verb`] - HTTP verb a handler is registered under
//! - [`Error`] - Core error types
//!
//! # Example
//!
//! ```rust,ignore
//! use unflare::core::{Request, Responder};
//!
//! fn greet(req: &Request, res: &mut Responder) {
//!     let name = req.param("name").unwrap_or("world");
//!     res.set_header("X-Greeting", "1");
//!     res.send(format!("Hello, {}!", name));
//! }
//! ```

mod error;
mod request;
mod response;
mod verb;

pub use error::{Error, Result};
pub use request::Request;
pub(crate) use response::plain_text;
pub use response::{Responder, ResponseBody, StatusText};
pub use verb::{UnknownVerb, Verb};
