//! Common types used throughout pagesweep
//!
//! Shared type definitions and aliases used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// TLS Trust Mode
// ============================================================================

/// How server certificates are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Validate the certificate chain and host name
    #[default]
    Verify,
    /// Accept any certificate. Only for lab clusters with self-signed certs.
    TrustAll,
}

impl TlsMode {
    /// Check if certificate validation is disabled
    pub fn is_insecure(self) -> bool {
        matches!(self, Self::TrustAll)
    }
}
