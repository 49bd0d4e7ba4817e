//! Transport-independent view of an HTTP request.

use std::io::{self, Read};
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
    Options,
    Head,
    Other,
}

/// Failure to take a request off the wire.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(u64),

    #[error("Failed to read request body: {0}")]
    Io(#[from] io::Error),
}

/// Read a whole body of at most `max` bytes.
///
/// One byte past the limit is enough to tell an oversized body apart.
pub fn read_body(reader: impl Read, max: u64) -> Result<Vec<u8>, ReadError> {
    let mut body = Vec::new();
    reader.take(max.saturating_add(1)).read_to_end(&mut body)?;
    if body.len() as u64 > max {
        return Err(ReadError::TooLarge(max));
    }
    Ok(body)
}

impl From<&tiny_http::Method> for Method {
    fn from(method: &tiny_http::Method) -> Self {
        match method {
            tiny_http::Method::Get => Self::Get,
            tiny_http::Method::Post => Self::Post,
            tiny_http::Method::Delete => Self::Delete,
            tiny_http::Method::Options => Self::Options,
            tiny_http::Method::Head => Self::Head,
            _ => Self::Other,
        }
    }
}

/// Method, path, decoded query, headers and body of one request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Build from a method and a raw request target (`/path?query`).
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            method,
            path: path.to_string(),
            query,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First non-empty value of a query parameter.
    ///
    /// Empty values count as absent, so `?name=` falls back to the default.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Rate-limit identity: first `X-Forwarded-For` hop, else `"unknown"`.
    pub fn client_id(&self) -> String {
        self.header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Read a tiny_http request whose body may be at most `max_body` bytes.
    pub fn from_tiny(request: &mut tiny_http::Request, max_body: u64) -> Result<Self, ReadError> {
        let mut api = request
            .headers()
            .iter()
            .fold(Self::new(request.method().into(), request.url()), |api, header| {
                api.with_header(header.field.as_str().as_str(), header.value.as_str())
            });

        if api.method == Method::Post {
            if request.body_length().is_some_and(|len| len as u64 > max_body) {
                return Err(ReadError::TooLarge(max_body));
            }
            api = api.with_body(read_body(request.as_reader(), max_body)?);
        }
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_path_and_query() {
        let req = ApiRequest::new(Method::Get, "/api/avatar?name=Jane%20Doe&size=128&x=");
        assert_eq!(req.path, "/api/avatar");
        assert_eq!(req.param("name"), Some("Jane Doe"));
        assert_eq!(req.param("size"), Some("128"));
        assert_eq!(req.param("x"), None);
        assert_eq!(req.param("missing"), None);
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let req = ApiRequest::new(Method::Get, "/api/image?name=Ada+Lovelace&color=%23ff0000");
        assert_eq!(req.param("name"), Some("Ada Lovelace"));
        assert_eq!(req.param("color"), Some("#ff0000"));
    }

    #[test]
    fn test_client_id() {
        let req = ApiRequest::new(Method::Get, "/")
            .with_header("X-Forwarded-For", " 10.0.0.1 , 192.168.0.1");
        assert_eq!(req.client_id(), "10.0.0.1");
        assert_eq!(ApiRequest::new(Method::Get, "/").client_id(), "unknown");
    }

    #[test]
    fn test_read_body_limit() {
        let body = read_body(Cursor::new(b"12345".to_vec()), 5).unwrap();
        assert_eq!(body, b"12345");
        assert!(read_body(Cursor::new(Vec::new()), 0).unwrap().is_empty());

        let err = read_body(Cursor::new(b"123456".to_vec()), 5).unwrap_err();
        assert!(matches!(err, ReadError::TooLarge(5)));
        assert_eq!(err.to_string(), "request body exceeds 5 bytes");
    }

    #[test]
    fn test_header_case_insensitive() {
        let req = ApiRequest::new(Method::Post, "/").with_header("Content-Type", "application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
    }
}
