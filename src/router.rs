//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler; everything the tree does not match becomes a JSON 404 or
//! 405 before reaching any handler code.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use serde_json::json;
use tracing::warn;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Endpoint, Middleware, Next};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;

/// The application router.
///
/// Holds one radix tree per HTTP method, the middleware stack, and the shared
/// state `S` that every handler receives. Build it once at startup; pass it
/// to [`Server::serve`](crate::Server::serve). Registration methods return
/// `self` so they chain naturally.
pub struct Router<S = ()> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    middleware: Arc<[Arc<dyn Middleware>]>,
    state: S,
}

impl Router<()> {
    /// A router without shared state.
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// A router whose handlers all receive a clone of `state`.
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), middleware: Arc::from(Vec::new()), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Appends a middleware layer. Layers registered first run outermost.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        let mut chain = self.middleware.to_vec();
        chain.push(Arc::new(middleware));
        self.middleware = chain.into();
        self
    }

    /// Routes one request and produces one response.
    ///
    /// Buffers the whole body first; a body that fails to arrive yields `400`.
    pub async fn call<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();

        let Ok(method) = Method::try_from(&parts.method) else {
            return fallback_response(Status::MethodNotAllowed, &[]).into_inner();
        };

        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(%method, path = parts.uri.path(), "failed to read request body: {e}");
                return Response::status(Status::BadRequest).into_inner();
            }
        };

        let path = parts.uri.path().to_owned();
        let (endpoint, params) = match self.lookup(method, &path) {
            Some((handler, params)) => {
                let state = self.state.clone();
                let endpoint: Endpoint = Box::new(move |req: Request| handler.call(req, state));
                (endpoint, params)
            }
            None => {
                let allowed = self.allowed_methods(&path);
                let status = if allowed.is_empty() { Status::NotFound } else { Status::MethodNotAllowed };
                let endpoint: Endpoint = Box::new(move |_req: Request| -> BoxFuture {
                    Box::pin(async move { fallback_response(status, &allowed) })
                });
                (endpoint, Vec::new())
            }
        };

        let req = Request::new(method, parts, body, params);
        let mut res = Next::new(Arc::clone(&self.middleware), endpoint).run(req).await;
        if method == Method::Head {
            res.body.clear();
        }
        res.into_inner()
    }

    /// `HEAD` falls back to the `GET` route when none is registered for it.
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler<S>, Vec<(String, String)>)> {
        match self.find(method, path) {
            None if method == Method::Head => self.find(Method::Get, path),
            found => found,
        }
    }

    fn find(&self, method: Method, path: &str) -> Option<(BoxedHandler<S>, Vec<(String, String)>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        if allowed.contains(&Method::Get) {
            allowed.push(Method::Head);
        }
        allowed.sort();
        allowed.dedup();
        allowed
    }
}

fn fallback_response(status: Status, allowed: &[Method]) -> Response {
    let (name, message) = match status {
        Status::NotFound => ("Not found", "No route matches this path"),
        _ => ("Method not allowed", "The route does not accept this method"),
    };
    let mut res = (status, Json(json!({ "error": { "name": name, "message": message } })))
        .into_response();
    if !allowed.is_empty() {
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        res.headers.push(("allow".to_owned(), allow));
    }
    res
}
