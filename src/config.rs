//! Endpoint and sweep configuration
//!
//! [`EndpointConfig`] is the immutable connection description handed to every
//! request of a sweep. [`ConfigFile`] is the on-disk parameter file (YAML or
//! JSON) a thin caller loads it from.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::pagination::{PagingPolicy, SweepSettings, DEFAULT_PAGE_SIZE};
use crate::request::ResourceKind;
use crate::types::TlsMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default Prism port
pub const DEFAULT_PORT: u16 = 9440;

/// Path prefix of the v3 API
pub const API_PREFIX: &str = "/api/nutanix/v3";

// ============================================================================
// Endpoint Config
// ============================================================================

/// Immutable description of the endpoint a sweep talks to
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    base_url: Url,
    credentials: Credentials,
    tls_mode: TlsMode,
    timeout: Duration,
}

impl EndpointConfig {
    /// Start building a config for an explicit API base URL
    pub fn builder(base_url: impl Into<String>, credentials: Credentials) -> EndpointConfigBuilder {
        EndpointConfigBuilder {
            base_url: base_url.into(),
            credentials,
            tls_mode: TlsMode::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Start building a config for `https://<host>:<port>/api/nutanix/v3`
    pub fn for_cluster(host: &str, port: u16, credentials: Credentials) -> EndpointConfigBuilder {
        Self::builder(format!("https://{host}:{port}{API_PREFIX}"), credentials)
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credentials for Basic authentication
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// TLS trust mode
    pub fn tls_mode(&self) -> TlsMode {
        self.tls_mode
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join a relative API path onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Builder for [`EndpointConfig`]
#[derive(Debug, Clone)]
pub struct EndpointConfigBuilder {
    base_url: String,
    credentials: Credentials,
    tls_mode: TlsMode,
    timeout: Duration,
}

impl EndpointConfigBuilder {
    /// Set the TLS trust mode
    #[must_use]
    pub fn tls_mode(mut self, mode: TlsMode) -> Self {
        self.tls_mode = mode;
        self
    }

    /// Accept any server certificate
    #[must_use]
    pub fn trust_all_certificates(self) -> Self {
        self.tls_mode(TlsMode::TrustAll)
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<EndpointConfig> {
        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }
        if self.credentials.username.is_empty() {
            return Err(Error::missing_field("username"));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_value("timeout_ms", "must be greater than zero"));
        }

        Ok(EndpointConfig {
            base_url,
            credentials: self.credentials,
            tls_mode: self.tls_mode,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// Config File
// ============================================================================

/// Parameter file describing a cluster and how to sweep it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Cluster IP or FQDN, used with `port` to form the base URL
    #[serde(default)]
    pub cluster_ip: Option<String>,

    /// Full API base URL, overrides `cluster_ip`/`port`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Prism port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for Basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password; prefer the environment or the prompt
    #[serde(default)]
    pub password: Option<String>,

    /// TLS trust mode
    #[serde(default)]
    pub tls: TlsMode,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Resource kind to list
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Paging settings
    #[serde(default)]
    pub paging: PagingSection,
}

/// Paging section of the parameter file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingSection {
    /// Server-enforced maximum page size
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// How follow-up pages are counted
    #[serde(default)]
    pub policy: PagingPolicy,

    /// Follow-up pages in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Keep entity payloads, or only counts
    #[serde(default = "default_true")]
    pub collect_entities: bool,

    /// Optional request pacing
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for PagingSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            policy: PagingPolicy::default(),
            concurrency: default_concurrency(),
            collect_entities: true,
            requests_per_second: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_kind() -> String {
    "vm".to_string()
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_concurrency() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl ConfigFile {
    /// Validate required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        match (&self.base_url, &self.cluster_ip) {
            (None, None) => return Err(Error::missing_field("cluster_ip")),
            (None, Some(ip)) if ip.trim().is_empty() => {
                return Err(Error::invalid_value("cluster_ip", "cannot be empty"))
            }
            _ => {}
        }

        match &self.username {
            None => return Err(Error::missing_field("username")),
            Some(u) if u.trim().is_empty() => {
                return Err(Error::invalid_value("username", "cannot be empty"))
            }
            Some(_) => {}
        }

        if self.timeout_ms == 0 {
            return Err(Error::invalid_value("timeout_ms", "must be greater than zero"));
        }

        ResourceKind::new(&self.kind)?;
        self.sweep_settings().validate()
    }

    /// API base URL derived from `base_url` or `cluster_ip` and `port`
    pub fn resolved_base_url(&self) -> Result<String> {
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }
        let host = self
            .cluster_ip
            .as_deref()
            .ok_or_else(|| Error::missing_field("cluster_ip"))?;
        Ok(format!("https://{host}:{}{API_PREFIX}", self.port))
    }

    /// Build the endpoint config with the resolved password
    pub fn endpoint(&self, password: impl Into<String>) -> Result<EndpointConfig> {
        let username = self
            .username
            .clone()
            .ok_or_else(|| Error::missing_field("username"))?;

        EndpointConfig::builder(
            self.resolved_base_url()?,
            Credentials::new(username, password),
        )
        .tls_mode(self.tls)
        .timeout(Duration::from_millis(self.timeout_ms))
        .build()
    }

    /// Paging settings as a [`SweepSettings`]
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings::new()
            .with_page_size(self.paging.page_size)
            .with_policy(self.paging.policy)
            .with_concurrency(self.paging.concurrency)
            .with_collect_entities(self.paging.collect_entities)
    }

    /// Request pacing, if configured
    pub fn rate_limit(&self) -> Option<RateLimiterConfig> {
        self.paging
            .requests_per_second
            .map(RateLimiterConfig::per_second)
    }
}

/// Load and validate a parameter file.
///
/// `.json` files are parsed as JSON, anything else as YAML.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: ConfigFile = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    config.validate()?;
    Ok(config)
}

/// Parse and validate a YAML parameter document
pub fn load_config_from_str(yaml: &str) -> Result<ConfigFile> {
    let config: ConfigFile = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
