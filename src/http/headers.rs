//! Header defaulting helpers.

use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

pub const EVENT_STREAM: &str = "text/event-stream";
pub const JSON: &str = "application/json";

/// Set `name` to `value` unless the map already holds a non-empty value.
pub fn fallback(headers: &mut HeaderMap, name: HeaderName, value: HeaderValue) {
    let present = headers.get(&name).is_some_and(|v| !v.is_empty());
    if !present {
        headers.insert(name, value);
    }
}

/// Apply the SSE request defaults: `Accept: text/event-stream` and
/// `Content-Type: application/json`.
pub fn apply_defaults(headers: &mut HeaderMap) {
    fallback(headers, ACCEPT, HeaderValue::from_static(EVENT_STREAM));
    fallback(headers, CONTENT_TYPE, HeaderValue::from_static(JSON));
}

/// Parse a header from its name and value.
pub fn parse(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name.trim())
        .map_err(|_| Error::InvalidRequest(format!("Invalid header name: {name}")))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| Error::InvalidRequest(format!("Invalid value for header {name}")))?;
    Ok((name, value))
}

/// Parse a `Name: value` header line, as given on a command line.
pub fn parse_line(line: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::InvalidRequest(format!("Expected 'Name: value', got: {line}")))?;
    parse(name, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let mut headers = HeaderMap::new();
        apply_defaults(&mut headers);
        assert_eq!(headers.get(ACCEPT).unwrap(), EVENT_STREAM);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), JSON);
    }

    #[test]
    fn test_fallback_keeps_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        apply_defaults(&mut headers);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn test_fallback_replaces_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(""));
        fallback(&mut headers, ACCEPT, HeaderValue::from_static(EVENT_STREAM));
        assert_eq!(headers.get(ACCEPT).unwrap(), EVENT_STREAM);
    }

    #[test]
    fn test_parse_line() {
        let (name, value) = parse_line("Authorization: Bearer abc:def").unwrap();
        assert_eq!(name, "authorization");
        assert_eq!(value, "Bearer abc:def");
    }

    #[test]
    fn test_parse_line_invalid() {
        assert!(parse_line("no-delimiter").is_err());
        assert!(parse_line("bad name: x").is_err());
        assert!(parse_line("x-ok: bad\nvalue").is_err());
    }
}
