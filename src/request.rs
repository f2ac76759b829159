//! The strategy's view of an incoming request.
//!
//! Extractors only need headers, the query string and (optionally) a parsed
//! body, so the strategy works on this snapshot rather than on a framework
//! specific request type.

use axum::http::{HeaderMap, Uri, request::Parts};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    headers: HeaderMap,
    uri: Uri,
    body: Option<Value>,
}

impl AuthRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot headers and URI of an axum/http request.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            headers: parts.headers.clone(),
            uri: parts.uri.clone(),
            body: None,
        }
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach a parsed body (JSON object or flattened form).
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Header value as text. Non-text values are treated as missing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First url-decoded value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// String field of the parsed body.
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body.as_ref()?.get(name)?.as_str()
    }
}
