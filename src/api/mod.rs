pub mod client;
pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::app::{BylineError, Result};
use crate::session::Credential;

pub use client::{ApiClient, UserUpdate};
pub use http::HttpGateway;

/// A fully described API call that has not been issued yet.
///
/// The domain layer builds descriptors (favorite toggles, follow requests,
/// feed queries) and hands them to a [`Gateway`] for execution, so intent
/// can be inspected and tested without touching the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the `/api` prefix, starting with `/`.
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport seam between the domain layer and the REST gateway.
///
/// The production implementation is [`HttpGateway`]; tests substitute an
/// in-memory gateway that replays canned payloads and counts requests.
#[async_trait]
pub trait Gateway {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        credential: Option<&Credential>,
    ) -> Result<Value>;
}

/// Unwrap a single-resource response one level deep (`article`, `profile`,
/// `comment`, `user`).
pub(crate) fn unwrap_envelope<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| BylineError::decode(key, "missing envelope key"))
}

/// Flatten the server's `{"errors": {field: [message, …]}}` envelope into
/// display lines. An unparseable envelope yields no lines; callers fall back
/// to a generic message.
pub(crate) fn decode_error_envelope(value: &Value) -> Vec<String> {
    let Some(errors) = value.get("errors").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut messages = Vec::new();
    for (field, entries) in errors {
        let Some(entries) = entries.as_array() else {
            continue;
        };
        for entry in entries {
            if let Some(text) = entry.as_str() {
                messages.push(format!("{} {}", field, text));
            }
        }
    }
    messages
}
