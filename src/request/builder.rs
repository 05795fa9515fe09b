//! Request builder implementation

use super::types::{PageRequest, ResourceKind};
use crate::auth::Authenticator;
use crate::config::EndpointConfig;
use crate::http::RequestDescriptor;

/// Builds authenticated page requests for one endpoint
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    endpoint: &'a EndpointConfig,
    authenticator: Authenticator,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder bound to an endpoint
    pub fn new(endpoint: &'a EndpointConfig) -> Self {
        Self {
            endpoint,
            authenticator: Authenticator::new(endpoint.credentials()),
        }
    }

    /// Describe a page
    pub fn page(&self, kind: &ResourceKind, length: u64, offset: u64) -> PageRequest {
        PageRequest {
            kind: kind.clone(),
            length,
            offset,
        }
    }

    /// Wire descriptor for a page: URI, method, body and headers
    pub fn descriptor(&self, page: &PageRequest) -> RequestDescriptor {
        let descriptor = RequestDescriptor::post_json(
            self.endpoint.url_for(&page.kind.list_path()),
            page.body(),
            self.endpoint.timeout(),
        )
        .with_header("Accept", "application/json")
        .with_header("Content-Type", "application/json")
        .with_header("Cache-Control", "no-cache");

        self.authenticator.apply(descriptor)
    }

    /// Describe a page and build its descriptor in one step
    pub fn build(&self, kind: &ResourceKind, length: u64, offset: u64) -> RequestDescriptor {
        self.descriptor(&self.page(kind, length, offset))
    }

    /// Endpoint this builder targets
    pub fn endpoint(&self) -> &EndpointConfig {
        self.endpoint
    }
}
