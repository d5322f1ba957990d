//! Request routing and handler dispatch.
//!
//! Handlers are explicit variants rather than inferred from their shape:
//!
//! - route handlers finish the response and end the chain
//! - middleware receive a [`Next`] and may continue it
//! - error handlers only run while an error is in flight
//!
//! # Example
//!
//! ```rust,ignore
//! use unflare::routing::{Handler, Router};
//!
//! let mut router = Router::new();
//! router.add(Handler::middleware(|req, res, next| Box::pin(async move {
//!     res.set_header("X-Powered-By", "unflare");
//!     next.run(req, res).await;
//!     Ok(())
//! })));
//! router.get("/users/:id", Handler::route_sync(|req, res| {
//!     res.json(&serde_json::json!({ "id": req.param("id") }))
//! }))?;
//! ```

mod chain;
mod handler;
mod pattern;
mod route;
mod router;

pub use handler::{BoxFuture, Handler, IntoHandlers, Next};
pub use pattern::{extract_params, match_path, normalize_path, Matcher, Pattern};
pub use route::Route;
pub use router::Router;
