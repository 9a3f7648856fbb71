//! Route parameter aliases resolved from a JWT.
//!
//! With an alias of `me` on parameter `id`, a request for `/users/me` carrying
//! a token whose payload is `{"sub": "42"}` reaches the handler as
//! `/users/42` with `req.param("id") == Some("42")`.
//!
//! ```rust,no_run
//! use http::Method;
//! use route_alias::{ParamAlias, Request, Response, Router, TokenLocation};
//!
//! # fn main() -> Result<(), route_alias::ConfigError> {
//! let me = ParamAlias::builder()
//!     .alias("me")
//!     .param_name("id")
//!     .token_location(TokenLocation::Header)
//!     .token_name("Authorization")
//!     .payload_key("sub")
//!     .build()?;
//!
//! let app = Router::new()
//!     .layer(me)
//!     .on(Method::GET, "/users/{id}", get_user);
//! # Ok(())
//! # }
//! # async fn get_user(_: Request) -> Response { Response::text("") }
//! ```
//!
//! The token is decoded, never verified. Put this behind whatever
//! authenticates the token.

use std::fmt;
use std::str::FromStr;

use http::StatusCode;
use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::ConfigError;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::token;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Where in the request the token is carried.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenLocation {
    Header,
    Query,
}

impl TokenLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query  => "query",
        }
    }
}

/// Parses `"header"` or `"query"`, ignoring ASCII case.
impl FromStr for TokenLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("header") {
            Ok(Self::Header)
        } else if s.eq_ignore_ascii_case("query") {
            Ok(Self::Query)
        } else {
            Err(ConfigError::UnsupportedLocation(s.to_owned()))
        }
    }
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw alias configuration, as read from a config file or environment.
///
/// Every field is required. They are optional here only so that a missing
/// key is reported by [`ParamAlias::new`] as [`ConfigError::MissingField`].
///
/// ```json
/// { "alias": "me", "paramName": "id", "tokenLocation": "header",
///   "tokenName": "Authorization", "payloadKey": "sub" }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasConfig {
    pub alias: Option<String>,
    pub param_name: Option<String>,
    pub token_location: Option<String>,
    pub token_name: Option<String>,
    pub payload_key: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingField(name))
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A request was rejected while resolving its alias.
///
/// Every variant is a client error and renders as `400 Bad Request` with a
/// JSON body `{"error": "<message>"}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AliasError {
    #[error("token does not exist")]
    MissingToken,

    #[error("token is not a valid JWT")]
    MalformedToken,

    #[error("`{0}` is not contained in token")]
    MissingClaim(String),
}

impl AliasError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for AliasError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        Response::builder()
            .status(self.status())
            .json(body.to_string().into_bytes())
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Replaces a route parameter equal to an alias with a claim from a JWT.
///
/// Built once at startup with [`ParamAlias::new`] or [`ParamAlias::builder`];
/// immutable afterwards and shared by every request.
#[derive(Debug)]
pub struct ParamAlias {
    alias: String,
    param_name: String,
    location: TokenLocation,
    token_name: String,
    payload_key: String,
    /// `/alias` (raw or percent-encoded) followed by `/` or the end of the path.
    segment: Regex,
}

impl ParamAlias {
    /// Validates `config`. Fails if any field is missing or empty, or if the
    /// token location is not `header` or `query`.
    pub fn new(config: AliasConfig) -> Result<Self, ConfigError> {
        let alias = required(config.alias, "alias")?;
        let param_name = required(config.param_name, "paramName")?;
        let location = required(config.token_location, "tokenLocation")?.parse::<TokenLocation>()?;
        let token_name = required(config.token_name, "tokenName")?;
        let payload_key = required(config.payload_key, "payloadKey")?;

        // Params arrive percent-decoded; the URL keeps the encoded form.
        let encoded = urlencoding::encode(&alias);
        let segment = Regex::new(&format!(
            "/(?:{}|{})(?P<end>/|$)",
            regex::escape(&alias),
            regex::escape(&encoded),
        ))
        .map_err(|e| ConfigError::Pattern(e.to_string()))?;

        Ok(Self { alias, param_name, location, token_name, payload_key, segment })
    }

    pub fn builder() -> ParamAliasBuilder {
        ParamAliasBuilder::default()
    }

    pub fn alias(&self) -> &str { &self.alias }
    pub fn param_name(&self) -> &str { &self.param_name }
    pub fn token_location(&self) -> TokenLocation { self.location }

    /// Resolves the alias on `req` in place.
    ///
    /// A no-op unless the parameter equals the alias. On error, `req` is left
    /// untouched.
    pub fn apply(&self, req: &mut Request) -> Result<(), AliasError> {
        if req.param(&self.param_name) != Some(self.alias.as_str()) {
            return Ok(());
        }

        let raw = self.find_token(req).ok_or(AliasError::MissingToken)?;
        let payload = token::decode_payload(token::strip_bearer(&raw)).map_err(|e| {
            debug!(location = %self.location, name = %self.token_name, error = %e, "token rejected");
            AliasError::MalformedToken
        })?;
        let value = token::claim(&payload, &self.payload_key)
            .ok_or_else(|| AliasError::MissingClaim(self.payload_key.clone()))?;

        let url = self.rewrite_url(req.url(), &value);
        debug!(param = %self.param_name, alias = %self.alias, %url, "alias resolved");
        req.set_url(url);
        req.set_param(self.param_name.as_str(), value);
        Ok(())
    }

    fn find_token(&self, req: &Request) -> Option<String> {
        let token = match self.location {
            TokenLocation::Header => req.header(&self.token_name).map(str::to_owned),
            TokenLocation::Query  => req.query_param(&self.token_name),
        };
        token.filter(|t| !t.is_empty())
    }

    /// Replaces the first path segment equal to the alias. The query string
    /// and fragment are never touched.
    fn rewrite_url(&self, url: &str, value: &str) -> String {
        let (path, rest) = url.split_at(url.find(['?', '#']).unwrap_or(url.len()));
        let path = self.segment.replacen(path, 1, |caps: &Captures<'_>| {
            format!("/{value}{}", &caps["end"])
        });
        format!("{path}{rest}")
    }
}

impl Middleware for ParamAlias {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture {
        match self.apply(&mut req) {
            Ok(()) => next.run(req),
            Err(e) => {
                debug!(param = %self.param_name(), alias = %self.alias(), url = %req.url(), error = %e, "alias rejected");
                Box::pin(async move { e.into_response() })
            }
        }
    }
}

/// Fluent construction of a [`ParamAlias`]; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ParamAliasBuilder {
    config: AliasConfig,
}

impl ParamAliasBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.config.alias = Some(alias.into());
        self
    }

    pub fn param_name(mut self, name: impl Into<String>) -> Self {
        self.config.param_name = Some(name.into());
        self
    }

    pub fn token_location(mut self, location: TokenLocation) -> Self {
        self.config.token_location = Some(location.as_str().to_owned());
        self
    }

    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.config.token_name = Some(name.into());
        self
    }

    pub fn payload_key(mut self, key: impl Into<String>) -> Self {
        self.config.payload_key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<ParamAlias, ConfigError> {
        ParamAlias::new(self.config)
    }
}
