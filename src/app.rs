//! Application entry point: adapts platform requests and resolves the final response.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use uuid::Uuid;

use crate::config::{AppConfig, ConfigError};
use crate::core::{plain_text, Error, Request, Responder};
use crate::logging::ACCESS_TARGET;
use crate::routing::Router;

type Hook = Box<dyn Fn() + Send + Sync>;
type NotFound = Box<dyn Fn(&Request) -> http::Response<Bytes> + Send + Sync>;

/// The root router plus request adaptation, hooks and fallback responses.
///
/// Routes are registered through [`Deref`] to the root [`Router`]. Once
/// built, an `App` can serve any number of concurrent [`fetch`](Self::fetch)
/// calls.
///
/// ```rust,ignore
/// let mut app = App::new();
/// app.get("/", Handler::route_sync(|_, res| {
///     res.send("Hello, World!");
///     Ok(())
/// }))?;
///
/// let response = app.fetch(request).await;
/// ```
pub struct App {
    router: Router,
    config: AppConfig,
    before_each: Vec<Hook>,
    after_each: Vec<Hook>,
    not_found: NotFound,
}

impl App {
    /// Create an app with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an app with configuration loaded from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_config(AppConfig::from_env()?))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let status = config.not_found_status;
        let body = config.not_found_body.clone();
        Self {
            router: Router::new(),
            config,
            before_each: Vec::new(),
            after_each: Vec::new(),
            not_found: Box::new(move |_| plain_text(status, &body, body.clone())),
        }
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[inline]
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Run `hook` before every dispatch, in registration order.
    pub fn before_each(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.before_each.push(Box::new(hook));
        self
    }

    /// Run `hook` after every dispatch, in registration order.
    pub fn after_each(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.after_each.push(Box::new(hook));
        self
    }

    /// Replace the response used when no handler finished the response.
    pub fn set_not_found(
        &mut self,
        factory: impl Fn(&Request) -> http::Response<Bytes> + Send + Sync + 'static,
    ) -> &mut Self {
        self.not_found = Box::new(factory);
        self
    }

    /// Handle one platform request.
    ///
    /// The response is, in priority order: whatever the handlers finished; the
    /// not-found response if nothing failed; a 500 carrying the unresolved
    /// error. A request that cannot be adapted (bad JSON body, unknown
    /// method) gets a 400 without running any handler.
    pub async fn fetch(&self, raw: http::Request<Bytes>) -> http::Response<Bytes> {
        let started = Instant::now();
        let method = raw.method().clone();
        let path = raw.uri().path().to_string();

        for hook in &self.before_each {
            hook();
        }

        let response = match Request::from_http(raw, self.config.strict_routing) {
            Ok(mut req) => {
                let mut res = Responder::new(req.host());
                let unresolved = self.router.dispatch(&mut req, &mut res, None).await;
                self.resolve(&req, res, unresolved)
            }
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "rejecting request");
                plain_text(StatusCode::BAD_REQUEST, "Bad Request", e.to_string())
            }
        };

        for hook in &self.after_each {
            hook();
        }

        if self.config.access_log {
            tracing::info!(
                target: ACCESS_TARGET,
                request_id = %Uuid::new_v4(),
                method = %method,
                path = %path,
                status = u64::from(response.status().as_u16()),
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                ""
            );
        }

        response
    }

    fn resolve(
        &self,
        req: &Request,
        res: Responder,
        unresolved: Option<Error>,
    ) -> http::Response<Bytes> {
        if res.is_done() {
            if let Some(err) = unresolved {
                tracing::debug!(error = %err, "dropping error raised after the response was sent");
            }
            return res.into_http();
        }

        match unresolved {
            None => (self.not_found)(req),
            Some(err) => {
                tracing::error!(
                    method = %req.method(),
                    path = %req.path(),
                    error = %err,
                    "unhandled error"
                );
                plain_text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    err.to_string(),
                )
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for App {
    type Target = Router;

    fn deref(&self) -> &Router {
        &self.router
    }
}

impl DerefMut for App {
    fn deref_mut(&mut self) -> &mut Router {
        &mut self.router
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("router", &self.router)
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish_non_exhaustive()
    }
}
