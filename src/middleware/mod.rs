//! Middleware layer.
//!
//! Middleware intercepts a request after routing and before the handler. It
//! sees the matched route parameters, may rewrite them, and either passes the
//! request on with [`Next::run`] or short-circuits with its own [`Response`](crate::Response).
//!
//! ```rust,no_run
//! use route_alias::middleware::{Middleware, Next};
//! use route_alias::{BoxFuture, Request};
//!
//! struct Trace;
//!
//! impl Middleware for Trace {
//!     fn call(&self, req: Request, next: Next) -> BoxFuture {
//!         tracing::info!(url = %req.url(), "request");
//!         next.run(req)
//!     }
//! }
//! ```
//!
//! Built-in middleware:
//! - [`ParamAlias`]: replaces an aliased route parameter with a JWT claim

mod alias;

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;

pub use alias::{AliasConfig, AliasError, ParamAlias, ParamAliasBuilder, TokenLocation};

/// A request interceptor registered with [`Router::layer`](crate::Router::layer).
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The rest of the pipeline: remaining middleware, then the route handler.
///
/// Consumed by [`run`](Next::run), so a middleware continues at most once.
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    index: usize,
    handler: BoxedHandler,
}

impl Next {
    pub(crate) fn new(chain: Arc<[BoxedMiddleware]>, handler: BoxedHandler) -> Self {
        Self { chain, index: 0, handler }
    }

    /// Continues with the next middleware, or the handler once the chain is done.
    pub fn run(self, req: Request) -> BoxFuture {
        match self.chain.get(self.index).cloned() {
            Some(middleware) => {
                let next = Self { index: self.index + 1, ..self };
                middleware.call(req, next)
            }
            None => self.handler.call(req),
        }
    }
}
