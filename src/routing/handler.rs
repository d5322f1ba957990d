//! Handler variants and the `next` continuation.

use std::future::{ready, Future};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use super::chain::{advance, DispatchState, Layer};
use crate::core::{Error, Request, Responder, Result, Verb};

pub use futures_util::future::BoxFuture;

type RouteFn =
    dyn for<'a> Fn(&'a mut Request, &'a mut Responder) -> BoxFuture<'a, Result<()>> + Send + Sync;

type MiddlewareFn = dyn for<'a> Fn(&'a mut Request, &'a mut Responder, Next<'a>) -> BoxFuture<'a, Result<()>>
    + Send
    + Sync;

type ErrorFn = dyn for<'a> Fn(&'a Error, &'a mut Request, &'a mut Responder, Next<'a>) -> BoxFuture<'a, Result<()>>
    + Send
    + Sync;

/// What a handler does when the chain reaches it.
#[derive(Clone)]
pub(crate) enum HandlerKind {
    /// Terminal: finishes the response and never continues the chain.
    Route(Arc<RouteFn>),
    /// Link: receives [`Next`] and may pass control forward.
    Middleware(Arc<MiddlewareFn>),
    /// Only runs while an error is in flight.
    Error(Arc<ErrorFn>),
}

/// A verb-tagged route handler, middleware, or error handler.
///
/// Handlers are cheap to clone; the same handler can be registered on
/// several routes.
#[derive(Clone)]
pub struct Handler {
    verb: Verb,
    kind: HandlerKind,
}

impl Handler {
    /// A route handler. It ends the chain whether or not it sends a response.
    ///
    /// ```rust,ignore
    /// Handler::route(|req, res| Box::pin(async move {
    ///     res.send(format!("user {}", req.param("id").unwrap_or("?")));
    ///     Ok(())
    /// }))
    /// ```
    pub fn route<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Responder) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            verb: Verb::All,
            kind: HandlerKind::Route(Arc::new(f)),
        }
    }

    /// A route handler from a synchronous closure.
    pub fn route_sync<F>(f: F) -> Self
    where
        F: Fn(&mut Request, &mut Responder) -> Result<()> + Send + Sync + 'static,
    {
        Self::route(move |req, res| Box::pin(ready(f(req, res))))
    }

    /// A middleware. Call [`Next::run`] to continue the chain.
    pub fn middleware<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Responder, Next<'a>) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            verb: Verb::All,
            kind: HandlerKind::Middleware(Arc::new(f)),
        }
    }

    /// An error handler. Call [`Next::run`] to recover, or [`Next::fail`] to pass
    /// an error on.
    ///
    /// The error only counts as resolved if the handler finishes the response
    /// or continues the chain. Returning `Ok(())` without doing either puts the
    /// same error back in flight for the next error handler.
    pub fn error<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Error, &'a mut Request, &'a mut Responder, Next<'a>) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            verb: Verb::All,
            kind: HandlerKind::Error(Arc::new(f)),
        }
    }

    /// An error handler from a synchronous closure that never continues the chain.
    pub fn error_sync<F>(f: F) -> Self
    where
        F: Fn(&Error, &mut Request, &mut Responder) -> Result<()> + Send + Sync + 'static,
    {
        Self::error(move |err, req, res, _next| Box::pin(ready(f(err, req, res))))
    }

    /// Tag with the verb this handler serves.
    #[inline]
    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verb = verb;
        self
    }

    #[inline]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    #[inline]
    pub fn is_route(&self) -> bool {
        matches!(self.kind, HandlerKind::Route(_))
    }

    #[inline]
    pub fn is_middleware(&self) -> bool {
        matches!(self.kind, HandlerKind::Middleware(_))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, HandlerKind::Error(_))
    }

    /// Short name used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            HandlerKind::Route(_) => "route",
            HandlerKind::Middleware(_) => "middleware",
            HandlerKind::Error(_) => "error",
        }
    }

    #[inline]
    pub(crate) fn kind(&self) -> &HandlerKind {
        &self.kind
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind_name())
            .field("verb", &self.verb)
            .finish()
    }
}

/// Continuation handed to middleware and error handlers.
///
/// Consumed on use, so the rest of the chain runs at most once per handler.
pub struct Next<'a> {
    layers: &'a [Layer],
    state: &'a mut DispatchState,
}

impl<'a> Next<'a> {
    pub(crate) fn new(layers: &'a [Layer], state: &'a mut DispatchState) -> Self {
        Self { layers, state }
    }

    /// Continue with the next eligible handler.
    pub fn run<'b>(self, req: &'b mut Request, res: &'b mut Responder) -> BoxFuture<'b, ()>
    where
        'a: 'b,
    {
        self.state.mark_continued();
        advance(self.layers, self.state, req, res, None)
    }

    /// Continue with `err` in flight; only error handlers run until it is resolved.
    pub fn fail<'b>(
        self,
        req: &'b mut Request,
        res: &'b mut Responder,
        err: impl Into<Error>,
    ) -> BoxFuture<'b, ()>
    where
        'a: 'b,
    {
        self.state.mark_continued();
        advance(self.layers, self.state, req, res, Some(err.into()))
    }
}

/// Flatten handlers, arrays and nested `Vec`s into one ordered list.
pub trait IntoHandlers {
    fn into_handlers(self) -> Vec<Handler>;
}

impl IntoHandlers for Handler {
    fn into_handlers(self) -> Vec<Handler> {
        vec![self]
    }
}

impl<T: IntoHandlers> IntoHandlers for Vec<T> {
    fn into_handlers(self) -> Vec<Handler> {
        self.into_iter().flat_map(IntoHandlers::into_handlers).collect()
    }
}

impl<T: IntoHandlers, const N: usize> IntoHandlers for [T; N] {
    fn into_handlers(self) -> Vec<Handler> {
        self.into_iter().flat_map(IntoHandlers::into_handlers).collect()
    }
}

/// Await a handler future, turning a panic into [`Error::Panic`].
pub(crate) async fn guarded<F>(fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(Error::Panic(message))
        }
    }
}
