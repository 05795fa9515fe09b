//! Sweep report types

use super::types::{PagingPolicy, SweepSettings, SweepState};
use crate::classify::{PageFailure, PageSuccess};
use crate::error::{Error, Result};
use crate::request::ResourceKind;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One received page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    /// 0 for the first page
    pub iteration: u64,
    /// Requested offset
    pub offset: u64,
    /// Entities in the page
    pub length: u64,
}

/// The page that stopped a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    /// Iteration that failed, 0 for the first page
    pub iteration: u64,
    /// Offset that was requested
    pub offset: u64,
    /// What went wrong
    #[serde(flatten)]
    pub failure: PageFailure,
}

impl std::fmt::Display for SweepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "iteration #{} (offset {}): {}",
            self.iteration, self.offset, self.failure
        )
    }
}

/// Everything a sweep produced, complete or partial
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Entity kind swept
    pub kind: ResourceKind,
    /// Terminal state
    pub state: SweepState,
    /// Page size `M` used
    pub page_size: u64,
    /// Paging policy used
    pub policy: PagingPolicy,
    /// `metadata.total_matches` of the first page
    pub total_reported: Option<u64>,
    /// Requests the plan called for, first page included
    pub planned_requests: Option<u64>,
    /// Received pages in offset order
    pub pages: Vec<PageSummary>,
    /// Entity payloads in offset order, empty when not collected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<JsonValue>,
    /// Set when the sweep ended in `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<SweepFailure>,
    /// When the first request was built
    pub started_at: DateTime<Utc>,
    /// Wall time of the sweep
    pub duration_ms: u64,
}

impl SweepReport {
    pub(crate) fn new(kind: ResourceKind, settings: &SweepSettings) -> Self {
        Self {
            kind,
            state: SweepState::Init,
            page_size: settings.page_size,
            policy: settings.policy,
            total_reported: None,
            planned_requests: None,
            pages: Vec::new(),
            entities: Vec::new(),
            failure: None,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub(crate) fn push_page(
        &mut self,
        iteration: u64,
        offset: u64,
        page: PageSuccess,
        collect_entities: bool,
    ) {
        self.pages.push(PageSummary {
            iteration,
            offset,
            length: page.length,
        });
        if collect_entities {
            self.entities.extend(page.entities);
        }
    }

    pub(crate) fn fail(&mut self, iteration: u64, offset: u64, failure: PageFailure) {
        self.failure = Some(SweepFailure {
            iteration,
            offset,
            failure,
        });
    }

    pub(crate) fn finish(mut self, state: SweepState, duration_ms: u64) -> Self {
        self.state = state;
        self.duration_ms = duration_ms;
        self
    }

    /// Entities received across all pages
    pub fn accumulated(&self) -> u64 {
        self.pages.iter().map(|p| p.length).sum()
    }

    /// Requests that completed, including a failed one
    pub fn requests_issued(&self) -> u64 {
        self.pages.len() as u64 + u64::from(self.failure.is_some())
    }

    /// Offsets of the received pages
    pub fn offsets(&self) -> Vec<u64> {
        self.pages.iter().map(|p| p.offset).collect()
    }

    /// Check if the sweep reached `Done`
    pub fn is_done(&self) -> bool {
        self.state == SweepState::Done
    }

    /// Check if the sweep finished and the page lengths add up to the reported total
    pub fn is_complete(&self) -> bool {
        self.is_done() && self.total_reported == Some(self.accumulated())
    }

    /// Split into `(entities, total_reported, failure)`
    pub fn into_parts(self) -> (Vec<JsonValue>, Option<u64>, Option<SweepFailure>) {
        (self.entities, self.total_reported, self.failure)
    }

    /// Turn a failed sweep into an error, keep a finished one
    pub fn into_result(self) -> Result<Self> {
        match &self.failure {
            Some(failure) => Err(Error::sweep_failed(
                self.kind.as_str(),
                failure.iteration,
                failure.failure.to_string(),
            )),
            None => Ok(self),
        }
    }
}
