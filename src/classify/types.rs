//! Classifier result types

use crate::http::TransportError;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Category of a failed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connectivity, timeout or authentication
    Network,
    /// Malformed request or response exchange
    Protocol,
    /// Response body did not have the expected shape
    Parse,
    /// Anything else
    Unclassified,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network error",
            Self::Protocol => "protocol error",
            Self::Parse => "parse error",
            Self::Unclassified => "unclassified error",
        };
        f.write_str(name)
    }
}

/// Why a page could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Failure category
    pub kind: FailureKind,
    /// HTTP status, when a response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Human-readable detail, passed through to the caller unchanged
    pub detail: String,
}

impl PageFailure {
    /// Create a failure without an HTTP status
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            detail: detail.into(),
        }
    }

    /// Attach the HTTP status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl std::fmt::Display for PageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl From<TransportError> for PageFailure {
    fn from(err: TransportError) -> Self {
        let kind = match err {
            TransportError::Network { .. } => FailureKind::Network,
            TransportError::ProtocolViolation { .. } => FailureKind::Protocol,
            TransportError::Unclassified { .. } => FailureKind::Unclassified,
        };
        Self::new(kind, err.message())
    }
}

/// A page that decoded cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct PageSuccess {
    /// Entities in this page (`metadata.length`)
    pub length: u64,
    /// Entities matching the request across all pages (`metadata.total_matches`)
    pub total_matches: u64,
    /// Offset echoed by the server, zero when absent
    pub offset: u64,
    /// Entity payloads
    pub entities: Vec<JsonValue>,
}

/// Outcome of one page request
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// Usable page
    Success(PageSuccess),
    /// Failed page
    Failure(PageFailure),
}

impl PageResult {
    /// Check if the page succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Entities in this page, zero on failure
    pub fn length(&self) -> u64 {
        match self {
            Self::Success(page) => page.length,
            Self::Failure(_) => 0,
        }
    }

    /// Reported total, only meaningful on success
    pub fn total_matches(&self) -> Option<u64> {
        match self {
            Self::Success(page) => Some(page.total_matches),
            Self::Failure(_) => None,
        }
    }

    /// Failure detail, if any
    pub fn failure(&self) -> Option<&PageFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<TransportError> for PageResult {
    fn from(err: TransportError) -> Self {
        Self::Failure(err.into())
    }
}
