//! Authenticator implementation
//!
//! Applies Basic authentication to outgoing request descriptors.

use super::types::Credentials;
use crate::http::RequestDescriptor;
use base64::Engine as _;

/// Header name carrying the credentials
pub const AUTHORIZATION: &str = "Authorization";

/// Build the value of a Basic `Authorization` header.
///
/// Encodes `"username:password"` with the standard padded base64 alphabet.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

/// Attaches credentials to request descriptors
#[derive(Clone)]
pub struct Authenticator {
    /// Precomputed header value
    header_value: String,
    /// Username, kept for logging
    username: String,
}

impl Authenticator {
    /// Create an authenticator for the given credentials
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            header_value: basic_auth_header(&credentials.username, &credentials.password),
            username: credentials.username.clone(),
        }
    }

    /// Attach the `Authorization` header, replacing any existing one
    #[must_use]
    pub fn apply(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        descriptor.with_header(AUTHORIZATION, self.header_value.clone())
    }

    /// Username the header was derived from
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
