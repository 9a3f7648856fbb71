//! Unified error types.
//!
//! Two families live here. [`Error`] surfaces infrastructure failures: binding
//! to a port, accepting a connection, registering a malformed route.
//! [`ConfigError`] is raised while building a middleware and never reaches a
//! request. Request-time rejections are [`AliasError`](crate::AliasError),
//! which render as HTTP responses instead.

use thiserror::Error;

/// The error type returned by the server and router's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    Address(String),

    #[error("invalid route `{path}`: {source}")]
    Route {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}

/// A middleware configuration was rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory field was absent or empty.
    #[error("missing required option `{0}`")]
    MissingField(&'static str),

    #[error("unsupported token location `{0}`, expected `header` or `query`")]
    UnsupportedLocation(String),

    /// The escaped alias still failed to compile, which only happens when it
    /// exceeds the regex size limit.
    #[error("cannot build alias pattern: {0}")]
    Pattern(String),
}
