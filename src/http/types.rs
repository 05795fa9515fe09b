//! Transport-level request and response types

use crate::types::JsonValue;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

/// A fully formed request, ready to hand to a [`super::Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers in insertion order
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<JsonValue>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Create a POST request with a JSON body
    pub fn post_json(url: impl Into<String>, body: JsonValue, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
            timeout,
        }
    }

    /// Set a header, replacing any existing header with the same name
    /// (compared case-insensitively)
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Timeout in whole milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, read to completion
    pub body: String,
}

impl RawResponse {
    /// Create a raw response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete an HTTP exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connect, timeout or send failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request or response body could not be encoded or read
    #[error("Protocol violation: {message}")]
    ProtocolViolation { message: String },

    /// Anything the transport could not place in another bucket
    #[error("Unclassified transport error: {message}")]
    Unclassified { message: String },
}

impl TransportError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a protocol violation error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Create an unclassified error
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
        }
    }

    /// The bare message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::ProtocolViolation { message }
            | Self::Unclassified { message } => message,
        }
    }

    /// Classify a reqwest error
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        let detail = error_chain(err);
        if err.is_timeout() {
            Self::network(format!(
                "Request timeout after {}ms",
                timeout.as_millis() as u64
            ))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {detail}"))
        } else if err.is_builder() || err.is_body() || err.is_decode() || err.is_redirect() {
            Self::protocol(detail)
        } else if err.is_request() {
            Self::network(format!("Request failed: {detail}"))
        } else {
            Self::unclassified(detail)
        }
    }
}

/// Join an error with its sources, reqwest hides the interesting part there
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
