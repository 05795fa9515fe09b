//! Pagination module
//!
//! Reconstructs a full collection from an API that caps every response at `M`
//! entities and only understands `length`/`offset`.
//!
//! # Overview
//!
//! A sweep sends the first page, learns the total from
//! `metadata.total_matches`, derives a [`PagePlan`] and then requests the
//! remaining pages in ascending offset order. Page failures stop the sweep but
//! never discard what was already collected; the caller gets a
//! [`SweepReport`] either way.
//!
//! ```text
//! Init -> FirstPageSent -> CountKnown -> Paging -> CountKnown -> ... -> Done
//!               |                          |
//!               +--------> Failed <--------+
//! ```

mod orchestrator;
mod plan;
mod report;
mod types;

pub use orchestrator::{fetch_all_entities, fetch_all_entities_with, Sweeper};
pub use plan::PagePlan;
pub use report::{PageSummary, SweepFailure, SweepReport};
pub use types::{CollectionCursor, PagingPolicy, SweepSettings, SweepState, DEFAULT_PAGE_SIZE};
