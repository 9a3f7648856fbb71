//! Echo route parameters, with `me` resolved from a bearer token.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! The alias is configured from the environment; every variable is optional
//! here and falls back to the value shown:
//!   ALIAS=me PARAM_NAME=id TOKEN_LOCATION=header TOKEN_NAME=authorization PAYLOAD_KEY=sub
//!
//! Try (the token's payload is {"sub":"42"}):
//!   TOKEN=eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiI0MiJ9.sig
//!   curl -H "authorization: Bearer $TOKEN" http://localhost:3000/users/me
//!   curl http://localhost:3000/users/7
//!   curl http://localhost:3000/users/me          # 400, token does not exist

use std::env;

use http::Method;
use route_alias::{AliasConfig, ParamAlias, Request, Response, Router, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let var = |key: &str, default: &str| Some(env::var(key).unwrap_or_else(|_| default.to_owned()));
    let me = ParamAlias::new(AliasConfig {
        alias: var("ALIAS", "me"),
        param_name: var("PARAM_NAME", "id"),
        token_location: var("TOKEN_LOCATION", "header"),
        token_name: var("TOKEN_NAME", "authorization"),
        payload_key: var("PAYLOAD_KEY", "sub"),
    })?;

    let app = Router::new()
        .layer(me)
        .on(Method::GET, "/users/{id}", echo_params)
        .on(Method::GET, "/users/{id}/posts", echo_params);

    Server::bind("0.0.0.0:3000")?.serve(app).await?;
    Ok(())
}

// GET /users/{id} → {"params":{"id":"42"},"url":"/users/42"}
async fn echo_params(req: Request) -> Response {
    let body = serde_json::json!({ "params": req.params(), "url": req.url() });
    Response::json(body.to_string().into_bytes())
}
