//! HTTP responses and their delivery over tiny_http.

use anyhow::{Result, anyhow};
use serde::Serialize;
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime::types::{JSON, PLAIN};

/// Status, headers and body of a response, built before it is sent.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            body: body.into(),
        }
    }

    /// Response without a body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, JSON, body),
            Err(_) => Self::new(500, PLAIN, "500 Internal Server Error"),
        }
    }

    /// 413 for a body over the configured limit.
    pub fn payload_too_large(limit: u64) -> Self {
        Self::json(
            413,
            &serde_json::json!({
                "error": {
                    "code": "PAYLOAD_TOO_LARGE",
                    "message": format!("Request body exceeds {limit} bytes"),
                }
            }),
        )
    }

    pub fn unavailable() -> Self {
        Self::new(503, PLAIN, "503 Service Unavailable")
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// First header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as JSON, for assertions.
    #[cfg(test)]
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Send over the wire, consuming the request.
    pub fn respond(self, request: Request) -> Result<()> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in &self.headers {
            response.add_header(make_header(name, value)?);
        }
        request.respond(response)?;
        Ok(())
    }
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}
