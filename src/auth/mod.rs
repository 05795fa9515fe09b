//! Authentication module
//!
//! HTTP Basic authentication for the list endpoints.
//!
//! The header value is derived once from the configured [`Credentials`] and
//! attached to every request descriptor of a sweep.

mod authenticator;
mod types;

pub use authenticator::{basic_auth_header, Authenticator};
pub use types::Credentials;
