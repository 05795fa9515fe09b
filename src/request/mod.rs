//! Request builder module
//!
//! Turns (resource kind, page length, offset) into the POST body and headers
//! the list endpoints expect.

mod builder;
mod types;

pub use builder::RequestBuilder;
pub use types::{PageRequest, ResourceKind};
