//! HTTP transport backed by reqwest
//!
//! One `reqwest::Client` per endpoint. The client carries the TLS trust
//! policy; the timeout travels with each descriptor.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::types::{RawResponse, RequestDescriptor, TransportError};
use crate::config::EndpointConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends a single request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. The connection is released before this returns.
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError> {
        (**self).send(descriptor).await
    }
}

/// Client-side settings that are not part of the endpoint itself
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Optional request pacing
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pagesweep/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Pace requests
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Production transport
pub struct HttpTransport {
    client: Client,
    rate_limiter: Option<RateLimiter>,
}

impl HttpTransport {
    /// Build a transport for the endpoint with default client settings
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        Self::with_config(endpoint, HttpClientConfig::default())
    }

    /// Build a transport for the endpoint
    pub fn with_config(endpoint: &EndpointConfig, config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(endpoint.timeout())
            .user_agent(&config.user_agent);

        if endpoint.tls_mode().is_insecure() {
            warn!(
                base_url = %endpoint.base_url(),
                "TLS certificate validation disabled for this endpoint"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;
        let rate_limiter = config.rate_limit.map(RateLimiter::new);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Check if request pacing is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.acquire().await;
        }

        let mut req = self
            .client
            .request(descriptor.method.clone(), &descriptor.url)
            .timeout(descriptor.timeout);

        for (key, value) in &descriptor.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = descriptor.body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, descriptor.timeout))?;

        let status = response.status().as_u16();
        // Reading the body to the end hands the connection back to the pool
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, descriptor.timeout))?;

        debug!(
            method = %descriptor.method,
            url = %descriptor.url,
            status,
            bytes = body.len(),
            "request completed"
        );

        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
