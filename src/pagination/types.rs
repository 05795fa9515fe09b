//! Pagination types
//!
//! Policy, settings, the sweep state machine and the running cursor.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest page the list endpoints return, whatever `length` asks for
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// How the number of follow-up pages is derived from the total count
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PagingPolicy {
    /// `ceil(total / M) - 1` follow-ups: every entity, no empty trailing page
    #[default]
    Ceiling,
    /// `floor(total / M)` follow-ups: one extra, empty request when the total
    /// is an exact multiple of `M`
    Floor,
}

/// Settings for one sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Page size `M`, also sent as `length`
    pub page_size: u64,
    /// Follow-up page arithmetic
    pub policy: PagingPolicy,
    /// Follow-up pages in flight at once
    pub concurrency: usize,
    /// Keep entity payloads in the report
    pub collect_entities: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            policy: PagingPolicy::default(),
            concurrency: 1,
            collect_entities: true,
        }
    }
}

impl SweepSettings {
    /// Create default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set paging policy
    #[must_use]
    pub fn with_policy(mut self, policy: PagingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set concurrency
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Keep or drop entity payloads
    #[must_use]
    pub fn with_collect_entities(mut self, collect: bool) -> Self {
        self.collect_entities = collect;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value(
                "page_size",
                "must be greater than zero",
            ));
        }
        if self.concurrency == 0 {
            return Err(Error::invalid_value(
                "concurrency",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Sweep state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepState {
    /// Nothing sent yet
    Init,
    /// First page in flight
    FirstPageSent,
    /// Total known, waiting for the next decision
    CountKnown,
    /// Follow-up page in flight
    Paging,
    /// Every planned page received
    Done,
    /// A page failed
    Failed,
}

impl SweepState {
    /// Check if `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: SweepState) -> bool {
        use SweepState::{CountKnown, Done, Failed, FirstPageSent, Init, Paging};
        matches!(
            (self, next),
            (Init, FirstPageSent)
                | (FirstPageSent, CountKnown | Failed)
                | (CountKnown, Paging | Done)
                | (Paging, CountKnown | Failed)
        )
    }

    /// Check for `Done` or `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for SweepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::FirstPageSent => "first_page_sent",
            Self::CountKnown => "count_known",
            Self::Paging => "paging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Running state of one sweep, owned by the orchestrator
#[derive(Debug, Clone)]
pub struct CollectionCursor {
    /// Total learned from the first page
    pub total_count: Option<u64>,
    /// Page size `M`
    pub page_size: u64,
    /// Offset of the page being processed
    pub offset: u64,
    /// Follow-up iterations completed (the first page is iteration 0)
    pub iterations_completed: u64,
    /// Entities received so far
    pub accumulated: u64,
    /// Pages that succeeded
    pub succeeded: u64,
    /// Pages that failed
    pub failed: u64,
    state: SweepState,
}

impl CollectionCursor {
    /// Create a cursor in `Init`
    pub fn new(page_size: u64) -> Self {
        Self {
            total_count: None,
            page_size,
            offset: 0,
            iterations_completed: 0,
            accumulated: 0,
            succeeded: 0,
            failed: 0,
            state: SweepState::Init,
        }
    }

    /// Current state
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Move to `next`
    pub fn advance(&mut self, next: SweepState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal sweep transition {} -> {next}",
            self.state
        );
        tracing::trace!(from = %self.state, to = %next, "sweep transition");
        self.state = next;
    }

    /// Point at follow-up iteration `iteration`
    pub fn begin_iteration(&mut self, iteration: u64) {
        self.offset = iteration.saturating_mul(self.page_size);
    }

    /// Record the first page and its reported total
    pub fn record_first_page(&mut self, total_count: u64, length: u64) {
        self.total_count = Some(total_count);
        self.accumulated += length;
        self.succeeded += 1;
    }

    /// Record a successful follow-up page
    pub fn record_page(&mut self, length: u64) {
        self.accumulated += length;
        self.succeeded += 1;
        self.iterations_completed += 1;
    }

    /// Record a failed page
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Requests that completed, successfully or not
    pub fn requests_completed(&self) -> u64 {
        self.succeeded + self.failed
    }
}
