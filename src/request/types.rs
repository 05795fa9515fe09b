//! Request types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Entity kind accepted by the list endpoints (`vm`, `image`, `subnet`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Validate and wrap a kind name
    pub fn new(kind: impl AsRef<str>) -> Result<Self> {
        let kind = kind.as_ref().trim();
        if kind.is_empty() {
            return Err(Error::invalid_value("kind", "cannot be empty"));
        }
        if !kind
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(Error::invalid_value(
                "kind",
                format!("'{kind}' must be lowercase letters, digits or '_'"),
            ));
        }
        Ok(Self(kind.to_string()))
    }

    /// The kind as sent in the request body
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Collection segment of the list path: `vm` -> `vms`, `category` -> `categories`
    pub fn plural(&self) -> String {
        match self.0.strip_suffix('y') {
            Some(stem) if !stem.ends_with(['a', 'e', 'o', 'u']) => format!("{stem}ies"),
            _ => format!("{}s", self.0),
        }
    }

    /// Path of the list endpoint relative to the API base
    pub fn list_path(&self) -> String {
        format!("{}/list", self.plural())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.0
    }
}

/// One page to request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Entity kind
    pub kind: ResourceKind,
    /// Requested page length
    pub length: u64,
    /// Zero-based index of the first entity
    pub offset: u64,
}

impl PageRequest {
    /// JSON body; `offset` is left out for the first page
    pub fn body(&self) -> JsonValue {
        let mut body = serde_json::json!({
            "kind": self.kind.as_str(),
            "length": self.length,
        });
        if self.offset > 0 {
            body["offset"] = self.offset.into();
        }
        body
    }
}
