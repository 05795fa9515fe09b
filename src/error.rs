//! Error types for pagesweep
//!
//! Crate-level errors cover configuration, I/O and client construction.
//! Page-level failures during a sweep are *data* (see [`crate::classify::PageFailure`])
//! and never travel through this type.

use thiserror::Error;

/// The main error type for pagesweep
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    // ============================================================================
    // Sweep Errors
    // ============================================================================
    #[error("Sweep of '{kind}' failed at iteration #{iteration}: {message}")]
    SweepFailed {
        kind: String,
        iteration: u64,
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a sweep failure error
    pub fn sweep_failed(kind: impl Into<String>, iteration: u64, message: impl Into<String>) -> Self {
        Self::SweepFailed {
            kind: kind.into(),
            iteration,
            message: message.into(),
        }
    }

    /// Whether the error came from user-supplied configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
                | Error::InvalidUrl(_)
                | Error::FileNotFound { .. }
        )
    }
}

/// Result type alias for pagesweep
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_field("username");
        assert_eq!(err.to_string(), "Missing required config field: username");

        let err = Error::invalid_value("page_size", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be greater than zero"
        );

        let err = Error::sweep_failed("vm", 2, "HTTP 503: unavailable");
        assert_eq!(
            err.to_string(),
            "Sweep of 'vm' failed at iteration #2: HTTP 503: unavailable"
        );
    }

    #[test]
    fn test_is_config() {
        assert!(Error::invalid_value("kind", "x").is_config());
        assert!(Error::missing_field("cluster_ip").is_config());
        assert!(Error::FileNotFound {
            path: "cluster.yaml".to_string()
        }
        .is_config());

        assert!(!Error::sweep_failed("vm", 0, "boom").is_config());
        assert!(!Error::Other("x".to_string()).is_config());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::missing_field("username"));
        let err = result.context("outer");
        assert!(err
            .unwrap_err()
            .to_string()
            .contains("outer: Missing required config field: username"));
    }

    #[test]
    fn test_result_context_from_io() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("reading cluster.yaml").unwrap_err();
        assert_eq!(err.to_string(), "reading cluster.yaml: IO error: denied");
    }
}
