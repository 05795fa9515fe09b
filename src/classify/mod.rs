//! Response classifier module
//!
//! Decides whether a page request succeeded and pulls out the counts the
//! orchestrator needs. Every outcome, including transport errors, ends up as a
//! [`PageResult`] value; nothing here returns `Err` or panics.

mod classifier;
mod types;

pub use classifier::classify;
pub use types::{FailureKind, PageFailure, PageResult, PageSuccess};

#[cfg(test)]
mod tests;
