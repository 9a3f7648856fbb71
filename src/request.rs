//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};

/// An incoming HTTP request.
///
/// Route parameters and the URL are mutable: middleware may rewrite them
/// before the handler runs, and everything downstream sees the new values.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            url: parts.uri.path_and_query().map_or("/", |pq| pq.as_str()).to_owned(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The request target in origin form, e.g. `/users/42?fields=name`.
    ///
    /// Scheme and authority are dropped, so HTTP/2 and absolute-form
    /// requests route the same as plain HTTP/1.1 ones.
    pub fn url(&self) -> &str { &self.url }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// The URL up to (not including) the query string or fragment.
    pub fn path(&self) -> &str {
        let end = self.url.find(['?', '#']).unwrap_or(self.url.len());
        &self.url[..end]
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.url.split_once('?')?;
        Some(rest.split_once('#').map_or(rest, |(q, _)| q))
    }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value of a query-string key, percent-decoded.
    ///
    /// For `/search?token=abc&x=1`, `req.query_param("token")` returns `Some("abc")`.
    pub fn query_param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query()?.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> { &self.params }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .header("X-Param", "abc")
            .body(Bytes::new())
            .unwrap()
            .into()
    }

    #[test]
    fn splits_path_and_query() {
        let mut req = request("/users/me");
        req.set_url("/users/me?token=a%2Bb&x=1#frag");
        assert_eq!(req.path(), "/users/me");
        assert_eq!(req.query(), Some("token=a%2Bb&x=1"));
        assert_eq!(req.query_param("token").as_deref(), Some("a+b"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn no_query_string() {
        let req = request("/users/me");
        assert_eq!(req.path(), "/users/me");
        assert_eq!(req.query(), None);
        assert_eq!(req.query_param("token"), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request("/");
        assert_eq!(req.header("x-param"), Some("abc"));
        assert_eq!(req.header("X-PARAM"), Some("abc"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn absolute_uri_is_reduced_to_origin_form() {
        let req = request("http://localhost:3000/users/me?token=abc");
        assert_eq!(req.url(), "/users/me?token=abc");
        assert_eq!(req.path(), "/users/me");
        assert_eq!(req.query_param("token").as_deref(), Some("abc"));
    }

    #[test]
    fn authority_only_uri_is_root() {
        let req = request("http://localhost:3000");
        assert_eq!(req.url(), "/");
    }

    #[test]
    fn params_are_mutable() {
        let mut req = request("/users/me");
        req.set_param("id", "me");
        req.set_param("id", "42");
        assert_eq!(req.param("id"), Some("42"));
        req.set_url("/users/42");
        assert_eq!(req.url(), "/users/42");
    }
}
