//! HTTP transport module
//!
//! The leaf of the request pipeline: sends one fully formed
//! [`RequestDescriptor`] and hands back the raw status and body.
//!
//! # Features
//!
//! - **Typed failures**: network, protocol and unclassified errors stay distinct
//! - **TLS trust policy**: certificate validation is on unless explicitly disabled
//! - **Pacing**: optional token bucket limiter using governor

mod client;
mod rate_limit;
mod types;

pub use client::{HttpClientConfig, HttpClientConfigBuilder, HttpTransport, Transport};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use types::{RawResponse, RequestDescriptor, TransportError};
