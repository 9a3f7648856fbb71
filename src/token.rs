//! Unverified JWT payload decoding.
//!
//! A JWT is `header.payload.signature`, each part base64url-encoded. The
//! payload is read without checking the signature or any time-based claim:
//! the caller only wants a value out of it, and whoever issued the token is
//! trusted elsewhere in the stack.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;

/// Tokens larger than this are rejected before any decoding.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a token could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token exceeds {MAX_TOKEN_SIZE_BYTES} bytes")]
    TooLarge,

    #[error("expected 3 dot-separated parts, found {0}")]
    Format(usize),

    #[error("{0} is not valid base64url")]
    Encoding(&'static str),

    #[error("{0} is not a JSON object")]
    Json(&'static str),
}

/// Removes a leading `Bearer ` scheme, if present.
pub fn strip_bearer(token: &str) -> &str {
    token.strip_prefix(BEARER_PREFIX).unwrap_or(token)
}

/// Decodes the payload of a compact JWT without verifying it.
///
/// The header must also decode to a JSON object, so arbitrary dotted strings
/// are not mistaken for tokens.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, TokenError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        return Err(TokenError::TooLarge);
    }

    let parts: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = parts.as_slice() else {
        return Err(TokenError::Format(parts.len()));
    };

    decode_part(header, "header")?;
    decode_part(payload, "payload")
}

fn decode_part(part: &str, name: &'static str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding(name))?;

    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(TokenError::Json(name)),
    }
}

/// Reads `key` from a decoded payload as a route-parameter string.
///
/// Falsy values (`null`, `false`, `0`, `""`) count as absent. Strings are
/// returned verbatim; any other value is rendered as JSON text.
pub fn claim(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(value.to_string())
    }

    fn token(payload: Value) -> String {
        let header = json!({"alg": "HS256", "typ": "JWT"});
        format!("{}.{}.sig", encode(&header), encode(&payload))
    }

    #[test]
    fn decodes_payload_without_verifying() {
        let payload = decode_payload(&token(json!({"sub": "42"}))).unwrap();
        assert_eq!(payload.get("sub"), Some(&json!("42")));
    }

    #[test]
    fn accepts_padded_parts() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
        let payload = format!("{}==", URL_SAFE_NO_PAD.encode(r#"{"a":1}"#));
        assert!(decode_payload(&format!("{header}.{payload}.")).is_ok());
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert_eq!(decode_payload("asdf"), Err(TokenError::Format(1)));
        assert_eq!(decode_payload("a.b.c.d"), Err(TokenError::Format(4)));
    }

    #[test]
    fn rejects_bad_encoding() {
        assert_eq!(decode_payload("!!.e30.sig"), Err(TokenError::Encoding("header")));
    }

    #[test]
    fn rejects_non_object_payload() {
        let header = encode(&json!({"alg": "HS256"}));
        let payload = encode(&json!("just a string"));
        assert_eq!(
            decode_payload(&format!("{header}.{payload}.sig")),
            Err(TokenError::Json("payload"))
        );
    }

    #[test]
    fn rejects_oversized_token() {
        let big = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);
        assert_eq!(decode_payload(&big), Err(TokenError::TooLarge));
    }

    #[test]
    fn strips_only_leading_bearer() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("xBearer abc"), "xBearer abc");
    }

    #[test]
    fn falsy_claims_are_absent() {
        let payload = decode_payload(&token(json!({
            "null": null, "no": false, "zero": 0, "empty": "",
            "id": "42", "n": 7, "yes": true,
        })))
        .unwrap();

        for key in ["null", "no", "zero", "empty", "missing"] {
            assert_eq!(claim(&payload, key), None, "{key}");
        }
        assert_eq!(claim(&payload, "id").as_deref(), Some("42"));
        assert_eq!(claim(&payload, "n").as_deref(), Some("7"));
        assert_eq!(claim(&payload, "yes").as_deref(), Some("true"));
    }
}
