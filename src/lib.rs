//! # route-alias
//!
//! Route parameter aliases for a minimal hyper-based HTTP stack.
//!
//! An alias is a sentinel parameter value such as `me` or `latest`. When a
//! request arrives for `/users/me`, [`ParamAlias`] reads a JWT from a header
//! or the query string, decodes its payload, and swaps `me` for a claim
//! (say, `sub`) in both the route parameter and the request URL before the
//! handler runs. Everything else passes through untouched.
//!
//! The token is decoded, not verified. Signature and expiry checks belong to
//! whatever authenticates the request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::Method;
//! use route_alias::{ParamAlias, Request, Response, Router, Server, TokenLocation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let me = ParamAlias::builder()
//!         .alias("me")
//!         .param_name("id")
//!         .token_location(TokenLocation::Header)
//!         .token_name("Authorization")
//!         .payload_key("sub")
//!         .build()?;
//!
//!     let app = Router::new()
//!         .layer(me)
//!         .on(Method::GET, "/users/{id}", get_user);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await?;
//!     Ok(())
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     // `GET /users/me` with a token for user 42 arrives here as `/users/42`.
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod token;

pub use error::{ConfigError, Error};
pub use handler::{BoxFuture, Handler};
pub use middleware::{AliasConfig, AliasError, ParamAlias, ParamAliasBuilder, TokenLocation};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
