// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagesweep
//!
//! Retrieves complete entity collections from list endpoints that cap every
//! response at a fixed page size and page with `length`/`offset` in a POST body.
//!
//! ## Features
//!
//! - **Count first**: the first page reports `metadata.total_matches`, which
//!   fixes the number of follow-up requests
//! - **Typed failures**: network, protocol, parse and unclassified failures stay
//!   distinct and never discard pages already received
//! - **Explicit configuration**: endpoint, credentials and TLS trust travel as
//!   one immutable value
//! - **Ordered concurrency**: follow-up pages can be fetched in parallel without
//!   changing the result
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagesweep::{fetch_all_entities, Credentials, EndpointConfig, ResourceKind, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let endpoint = EndpointConfig::for_cluster("10.0.0.10", 9440, Credentials::new("admin", "..."))
//!         .build()?;
//!     let kind = ResourceKind::new("vm")?;
//!
//!     let report = fetch_all_entities(&endpoint, &kind).await?;
//!     let (entities, total, failure) = report.into_parts();
//!     println!("{} of {:?} entities, failure: {:?}", entities.len(), total, failure);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Pagination Orchestrator                  │
//! │   first page → total → PagePlan → follow-ups → report    │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──┬──────────────┬──────────┐
//! │   Request    │      Auth      │  Transport   │ Classify │
//! ├──────────────┼────────────────┼──────────────┼──────────┤
//! │ kind/offset  │ Basic header   │ reqwest      │ 2xx+JSON │
//! │ POST body    │                │ TLS policy   │ taxonomy │
//! │ headers      │                │ Rate limit   │          │
//! └──────────────┴────────────────┴──────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Basic authentication
pub mod auth;

/// HTTP transport with TLS policy and rate limiting
pub mod http;

/// List request construction
pub mod request;

/// Response classification
pub mod classify;

/// Sweep orchestration
pub mod pagination;

/// Endpoint and parameter file configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::Credentials;
pub use classify::{FailureKind, PageFailure, PageResult};
pub use config::{load_config, ConfigFile, EndpointConfig};
pub use http::{HttpTransport, Transport};
pub use pagination::{
    fetch_all_entities, fetch_all_entities_with, PagingPolicy, SweepReport, SweepSettings,
    SweepState, Sweeper,
};
pub use request::ResourceKind;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
