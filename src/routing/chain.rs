//! The shared dispatch loop behind routes and routers.
//!
//! Each dispatch owns a [`DispatchState`] on its own stack frame. Handlers
//! reach it only through [`Next`], so a Route or Router never holds
//! per-request state and can serve overlapping requests.

use super::handler::{guarded, BoxFuture, HandlerKind, Next};
use super::route::Route;
use super::router::Mount;
use super::Handler;
use crate::core::{Error, Request, Responder};

/// One entry in a route's or router's ordered handler list.
pub(crate) enum Layer {
    Handler(Handler),
    Route(Route),
    Mount(Mount),
}

/// Cursor and leftover error for one dispatch over one layer list.
#[derive(Debug, Default)]
pub(crate) struct DispatchState {
    /// Next layer to consider. Only ever moves forward.
    cursor: usize,
    /// Error that reached the end of the list unresolved.
    unresolved: Option<Error>,
    /// How many times a handler has handed control on through [`Next`].
    continuations: usize,
}

impl DispatchState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take_unresolved(&mut self) -> Option<Error> {
        self.unresolved.take()
    }

    pub(crate) fn mark_continued(&mut self) {
        self.continuations += 1;
    }
}

/// Run layers from the cursor on until one ends the chain.
///
/// With no error in flight, verb-matching middleware and route handlers run;
/// with one, only error handlers do. An error handler that neither finishes
/// the response nor continues through [`Next`] leaves the error in flight.
/// Route and mount layers that accept the request run their own chain and
/// hand back whatever error they could not resolve. The loop stops once the
/// response is done.
pub(crate) fn advance<'a>(
    layers: &'a [Layer],
    state: &'a mut DispatchState,
    req: &'a mut Request,
    res: &'a mut Responder,
    mut err: Option<Error>,
) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        loop {
            if res.is_done() {
                if let Some(e) = err {
                    tracing::debug!(error = %e, "dropping error raised after the response was sent");
                }
                return;
            }

            let Some(layer) = layers.get(state.cursor) else {
                if err.is_some() {
                    state.unresolved = err;
                }
                return;
            };
            state.cursor += 1;
            let verb = req.method();

            match (layer, err.take()) {
                (Layer::Handler(handler), None) if handler.verb().matches(verb) => {
                    match handler.kind() {
                        HandlerKind::Route(f) => {
                            match guarded(async { f(&mut *req, &mut *res).await }).await {
                                Ok(()) => return,
                                Err(e) => err = Some(e),
                            }
                        }
                        HandlerKind::Middleware(f) => {
                            let next = Next::new(layers, &mut *state);
                            match guarded(async { f(&mut *req, &mut *res, next).await }).await {
                                Ok(()) => return,
                                Err(e) => err = Some(e),
                            }
                        }
                        HandlerKind::Error(_) => {}
                    }
                }
                (Layer::Handler(handler), Some(e)) => match handler.kind() {
                    HandlerKind::Error(f) if handler.verb().matches(verb) => {
                        let continuations = state.continuations;
                        let next = Next::new(layers, &mut *state);
                        let outcome =
                            guarded(async { f(&e, &mut *req, &mut *res, next).await }).await;
                        let continued = state.continuations != continuations;
                        match outcome {
                            Ok(()) if res.is_done() || continued => return,
                            Ok(()) => {
                                tracing::debug!(error = %e, "error left unresolved");
                                err = Some(e);
                            }
                            Err(raised) => err = Some(raised),
                        }
                    }
                    _ => err = Some(e),
                },
                (Layer::Handler(_), None) => {}
                (Layer::Route(route), e) => err = route.dispatch(req, res, e).await,
                (Layer::Mount(mount), e) => err = mount.dispatch(req, res, e).await,
            }
        }
    })
}
