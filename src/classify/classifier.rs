//! Classifier implementation

use super::types::{FailureKind, PageFailure, PageResult, PageSuccess};
use crate::http::RawResponse;
use crate::types::JsonValue;
use serde::Deserialize;
use tracing::warn;

/// Longest body excerpt carried in a failure detail
const MAX_DETAIL_CHARS: usize = 512;

/// List response, only the parts the sweep relies on
#[derive(Debug, Deserialize)]
struct ListResponse {
    metadata: ListMetadata,
    #[serde(default)]
    entities: Option<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct ListMetadata {
    total_matches: u64,
    length: u64,
    #[serde(default)]
    offset: Option<u64>,
}

/// Error body returned by the v3 API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message_list: Vec<ApiErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// Classify a raw response as a usable page or a failure
pub fn classify(response: &RawResponse) -> PageResult {
    if !response.is_success() {
        return PageResult::Failure(status_failure(response));
    }

    let decoded: ListResponse = match serde_json::from_str(&response.body) {
        Ok(decoded) => decoded,
        Err(e) => {
            return PageResult::Failure(
                PageFailure::new(
                    FailureKind::Parse,
                    format!("Unexpected list response shape: {e}"),
                )
                .with_status(response.status),
            )
        }
    };

    let entities = decoded.entities.unwrap_or_default();
    let length = decoded.metadata.length;
    if !entities.is_empty() && entities.len() as u64 != length {
        warn!(
            length,
            entities = entities.len(),
            "metadata.length disagrees with the entities array"
        );
    }

    PageResult::Success(PageSuccess {
        length,
        total_matches: decoded.metadata.total_matches,
        offset: decoded.metadata.offset.unwrap_or(0),
        entities,
    })
}

/// Build the failure for a non-2xx response
fn status_failure(response: &RawResponse) -> PageFailure {
    let kind = match response.status {
        401 | 403 | 407 | 408 | 429 => FailureKind::Network,
        s if s >= 500 => FailureKind::Network,
        _ => FailureKind::Protocol,
    };

    let detail = match api_messages(&response.body) {
        Some(messages) => format!("HTTP {}: {messages}", response.status),
        None => format!("HTTP {}: {}", response.status, excerpt(&response.body)),
    };

    PageFailure::new(kind, detail).with_status(response.status)
}

/// Pull `message_list[].message` out of an API error body
fn api_messages(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    if parsed.message_list.is_empty() {
        return None;
    }
    Some(
        parsed
            .message_list
            .into_iter()
            .map(|m| m.message)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_DETAIL_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push_str("...");
    cut
}
