//! Ordered collections of routes, mounted routers and handlers.

use super::chain::{advance, DispatchState, Layer};
use super::handler::{BoxFuture, IntoHandlers};
use super::pattern::{Pattern, Prefix};
use super::route::Route;
use crate::core::{Error, Request, Responder, Result, Verb};

/// Generates one `(pattern, handlers)` registration method per verb.
macro_rules! verb_methods {
    ($($name:ident => $verb:expr;)*) => {
        $(
            #[doc = concat!("Register handlers for `", stringify!($name), "` requests on `pattern`.")]
            pub fn $name(
                &mut self,
                pattern: impl Into<Pattern>,
                handlers: impl IntoHandlers,
            ) -> Result<&mut Route> {
                self.route(pattern)?.handle_verb($verb, handlers)
            }
        )*
    };
}

/// An ordered list of routes, mounted routers, middleware and error handlers.
///
/// Registration order is dispatch order. The first child that accepts a
/// request runs; if it leaves the response unfinished the next one gets a
/// turn.
#[derive(Default)]
pub struct Router {
    layers: Vec<Layer>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The route for `pattern`, created on first use.
    ///
    /// Patterns compare by text after slash trimming, so `"/users/"` and
    /// `"users"` share a route. Nested routers are not searched.
    pub fn route(&mut self, pattern: impl Into<Pattern>) -> Result<&mut Route> {
        let pattern = pattern.into();
        let existing = self.layers.iter().position(|layer| match layer {
            Layer::Route(route) => route.matcher().is_same(&pattern),
            _ => false,
        });

        let index = match existing {
            Some(index) => index,
            None => {
                self.layers.push(Layer::Route(Route::new(pattern)?));
                self.layers.len() - 1
            }
        };

        match &mut self.layers[index] {
            Layer::Route(route) => Ok(route),
            _ => Err(Error::Custom(
                "router layer changed kind during registration".to_string(),
            )),
        }
    }

    /// Register handlers for `verb` on `pattern`.
    pub fn handle_verb(
        &mut self,
        verb: Verb,
        pattern: impl Into<Pattern>,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Route> {
        self.route(pattern)?.handle_verb(verb, handlers)
    }

    verb_methods! {
        get => Verb::Get;
        head => Verb::Head;
        post => Verb::Post;
        put => Verb::Put;
        patch => Verb::Patch;
        delete => Verb::Delete;
        connect => Verb::Connect;
        options => Verb::Options;
        trace => Verb::Trace;
        all => Verb::All;
    }

    /// Append middleware and error handlers.
    ///
    /// Route handlers are dropped here; register them with a verb method.
    pub fn add(&mut self, handlers: impl IntoHandlers) -> &mut Self {
        for handler in handlers.into_handlers() {
            if handler.is_route() {
                tracing::warn!("ignoring route handler passed to Router::add()");
                continue;
            }
            self.layers.push(Layer::Handler(handler.with_verb(Verb::All)));
        }
        self
    }

    /// Mount a router at this router's root.
    pub fn mount(&mut self, router: Router) -> &mut Self {
        self.layers.push(Layer::Mount(Mount {
            prefix: None,
            router,
        }));
        self
    }

    /// Mount a router under `prefix`.
    ///
    /// The prefix may hold `:name` params; they are merged into the request
    /// before the child runs, and the child matches the rest of the path.
    ///
    /// Prefixes are case-insensitive. With strict routing the prefix is taken
    /// as written, so `"/api/"` only admits paths that continue past the
    /// slash and `"api"` never matches a path starting with `/`. Otherwise the
    /// prefix is normalized like a route pattern.
    pub fn nest(&mut self, prefix: &str, router: Router) -> Result<&mut Self> {
        let prefix = Prefix::compile(prefix)?;
        self.layers.push(Layer::Mount(Mount { prefix, router }));
        Ok(self)
    }

    /// Whether any child accepts the request.
    pub fn can_handle(&self, req: &Request) -> bool {
        self.accepts(req.method(), req.routing_path(), req.is_strict())
    }

    pub(crate) fn accepts(&self, verb: Verb, path: &str, strict: bool) -> bool {
        self.layers.iter().any(|layer| match layer {
            Layer::Route(route) => route.accepts(verb, path, strict),
            Layer::Mount(mount) => mount.accepts(verb, path, strict),
            Layer::Handler(_) => false,
        })
    }

    /// Run this router's chain and return the error left unresolved, if any.
    pub fn dispatch<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Responder,
        err: Option<Error>,
    ) -> BoxFuture<'a, Option<Error>> {
        Box::pin(async move {
            let mut state = DispatchState::new();
            advance(&self.layers, &mut state, req, res, err).await;
            state.take_unresolved()
        })
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for layer in &self.layers {
            match layer {
                Layer::Handler(handler) => list.entry(handler),
                Layer::Route(route) => list.entry(route),
                Layer::Mount(mount) => list.entry(&mount.prefix.as_ref().map(Prefix::as_str)),
            };
        }
        list.finish()
    }
}

/// A router mounted inside another, optionally under a prefix.
pub(crate) struct Mount {
    prefix: Option<Prefix>,
    router: Router,
}

impl Mount {
    /// Bytes of `path` the prefix consumes, or `None` if it does not match.
    fn consumed(&self, path: &str, strict: bool) -> Option<usize> {
        match &self.prefix {
            Some(prefix) => prefix.consume(path, strict).map(|(len, _)| len),
            None => Some(0),
        }
    }

    fn accepts(&self, verb: Verb, path: &str, strict: bool) -> bool {
        self.consumed(path, strict)
            .is_some_and(|len| self.router.accepts(verb, &path[len..], strict))
    }

    /// Run the mounted router with the prefix stripped from the routing path.
    pub(crate) fn dispatch<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Responder,
        err: Option<Error>,
    ) -> BoxFuture<'a, Option<Error>> {
        Box::pin(async move {
            let (len, params) = match &self.prefix {
                Some(prefix) => match prefix.consume(req.routing_path(), req.is_strict()) {
                    Some(found) => found,
                    None => return err,
                },
                None => (0, Default::default()),
            };

            let remainder = req.routing_path().get(len..).unwrap_or("");
            if !self.router.accepts(req.method(), remainder, req.is_strict()) {
                return err;
            }

            if err.is_none() {
                req.merge_params(params);
            }
            let previous = req.enter_mount(len);
            let unresolved = self.router.dispatch(req, res, err).await;
            req.leave_mount(previous);
            unresolved
        })
    }
}
