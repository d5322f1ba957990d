//! A single path pattern bound to verb-tagged handlers.

use super::chain::{advance, DispatchState, Layer};
use super::handler::{BoxFuture, Handler, IntoHandlers};
use super::pattern::{Matcher, Pattern};
use crate::core::{Error, Request, Responder, Result, Verb};

/// Generates one registration method per verb.
macro_rules! verb_methods {
    ($($(#[$doc:meta])* $name:ident => $verb:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self, handlers: impl IntoHandlers) -> Result<&mut Self> {
                self.handle_verb($verb, handlers)
            }
        )*
    };
}

/// One path pattern with its ordered handler list.
///
/// A route only accepts requests whose verb it has a registration for.
/// Handlers added with [`add`](Self::add) run for every such request but do
/// not register a verb on their own.
pub struct Route {
    matcher: Matcher,
    verbs: Vec<Verb>,
    layers: Vec<Layer>,
}

impl Route {
    /// Create a route. Fails only for a raw pattern that does not compile.
    pub fn new(pattern: impl Into<Pattern>) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::compile(pattern)?,
            verbs: Vec::new(),
            layers: Vec::new(),
        })
    }

    #[inline]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Pattern text as registered.
    #[inline]
    pub fn path(&self) -> &str {
        self.matcher.as_str()
    }

    /// Verbs this route has registrations for, in first-registration order.
    #[inline]
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Number of handlers, across all verbs.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Append middleware and error handlers for every verb.
    ///
    /// Route handlers are dropped here; register them with a verb method.
    pub fn add(&mut self, handlers: impl IntoHandlers) -> &mut Self {
        for handler in handlers.into_handlers() {
            if handler.is_route() {
                tracing::warn!(path = %self.path(), "ignoring route handler passed to add()");
                continue;
            }
            self.layers.push(Layer::Handler(handler.with_verb(Verb::All)));
        }
        self
    }

    /// Append handlers tagged with `verb` and register the verb.
    pub fn handle_verb(&mut self, verb: Verb, handlers: impl IntoHandlers) -> Result<&mut Self> {
        let handlers = handlers.into_handlers();
        if handlers.is_empty() {
            return Err(Error::InvalidArguments(format!(
                "{} {} needs at least one handler",
                verb,
                self.path()
            )));
        }

        if !self.verbs.contains(&verb) {
            self.verbs.push(verb);
        }
        self.layers.extend(
            handlers
                .into_iter()
                .map(|handler| Layer::Handler(handler.with_verb(verb))),
        );
        Ok(self)
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
        /// Register for every verb.
        all => Verb::All;
    }

    /// Whether the verb is registered here and the path matches.
    pub fn can_handle(&self, req: &Request) -> bool {
        self.accepts(req.method(), req.routing_path(), req.is_strict())
    }

    pub(crate) fn accepts(&self, verb: Verb, path: &str, strict: bool) -> bool {
        self.verbs.iter().any(|v| v.matches(verb)) && self.matcher.is_match(path, strict)
    }

    /// Run this route's chain.
    ///
    /// A request the route cannot handle passes through untouched, `err`
    /// included. Params are merged only when no error is in flight. Returns
    /// the error still unresolved at the end of the chain.
    pub fn dispatch<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Responder,
        err: Option<Error>,
    ) -> BoxFuture<'a, Option<Error>> {
        Box::pin(async move {
            if !self.can_handle(req) {
                return err;
            }
            if err.is_none() {
                let params = self.matcher.params(req.routing_path(), req.is_strict());
                req.merge_params(params);
            }

            tracing::trace!(path = %self.path(), method = %req.method(), "dispatching route");
            let mut state = DispatchState::new();
            advance(&self.layers, &mut state, req, res, err).await;
            state.take_unresolved()
        })
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path())
            .field("verbs", &self.verbs)
            .field("handlers", &self.layers.len())
            .finish()
    }
}
