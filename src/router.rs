//! Radix-tree request router with a middleware chain.
//!
//! One tree per HTTP method. O(path-length) lookup. Route parameters are
//! filled in before middleware runs, so middleware can inspect and rewrite
//! them; the handler sees the result.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    chain: Arc<[BoxedMiddleware]>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), chain: Arc::new([]) }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use http::Method;
    /// # use route_alias::{Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/users/{id}", get_user)
    ///     .on(Method::POST, "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing
    /// one. Use [`try_on`](Router::try_on) for routes built at runtime.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.try_on(method, path, handler)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_on(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .map_err(|source| Error::Route { path: path.to_owned(), source })?;
        Ok(self)
    }

    /// Adds a middleware run on every route, after those added before it.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        let mut chain = self.chain.to_vec();
        chain.push(Arc::new(middleware));
        self.chain = chain.into();
        self
    }

    /// Routes one request through the middleware chain to its handler.
    ///
    /// Unmatched method/path pairs get `404 Not Found` without running
    /// middleware.
    pub async fn call(&self, mut req: Request) -> Response {
        let Some((handler, params)) = self.lookup(&req.method, req.path()) else {
            return Response::status(StatusCode::NOT_FOUND);
        };
        req.params = params;
        Next::new(Arc::clone(&self.chain), handler).run(req).await
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), decode_param(v)))
            .collect();
        Some((handler, params))
    }
}

/// Percent-decodes a matched segment. Invalid UTF-8 after decoding keeps the
/// raw text.
fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |v| v.into_owned())
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BoxFuture;
    use bytes::Bytes;

    async fn echo(req: Request) -> Response {
        Response::text(format!("{} {}", req.param("id").unwrap_or("-"), req.url()))
    }

    fn get(uri: &str) -> Request {
        http::Request::get(uri).body(Bytes::new()).unwrap().into()
    }

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn call(&self, mut req: Request, next: Next) -> BoxFuture {
            let id = format!("{}{}", req.param("id").unwrap_or(""), self.0);
            req.set_param("id", id);
            next.run(req)
        }
    }

    struct Deny;

    impl Middleware for Deny {
        fn call(&self, _req: Request, _next: Next) -> BoxFuture {
            Box::pin(async { Response::status(StatusCode::FORBIDDEN) })
        }
    }

    #[tokio::test]
    async fn fills_params() {
        let app = Router::new().on(Method::GET, "/users/{id}", echo);
        let res = app.call(get("/users/7?x=1")).await;
        assert_eq!(res.body(), b"7 /users/7?x=1");
    }

    #[tokio::test]
    async fn params_are_percent_decoded() {
        let app = Router::new().on(Method::GET, "/users/{id}", echo);
        let res = app.call(get("/users/my%20user")).await;
        assert_eq!(res.body(), b"my user /users/my%20user");
    }

    #[tokio::test]
    async fn absolute_uri_routes() {
        let app = Router::new().on(Method::GET, "/users/{id}", echo);
        let res = app.call(get("http://localhost:3000/users/7")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"7 /users/7");
    }

    #[tokio::test]
    async fn unmatched_is_404() {
        let app = Router::new().on(Method::GET, "/users/{id}", echo);
        assert_eq!(app.call(get("/nope")).await.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn middleware_runs_in_order() {
        let app = Router::new()
            .layer(Tag("a"))
            .layer(Tag("b"))
            .on(Method::GET, "/{id}", echo);
        let res = app.call(get("/x")).await;
        assert_eq!(res.body(), b"xab /x");
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let app = Router::new()
            .layer(Deny)
            .layer(Tag("never"))
            .on(Method::GET, "/{id}", echo);
        assert_eq!(app.call(get("/x")).await.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_route_is_an_error() {
        let res = Router::new()
            .try_on(Method::GET, "/{id}", echo)
            .and_then(|r| r.try_on(Method::GET, "/{other}", echo));
        assert!(matches!(res, Err(Error::Route { .. })));
    }
}
