//! Page plan arithmetic

use super::types::PagingPolicy;
use serde::Serialize;

/// Follow-up pages needed for a reported total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    /// Reported total
    pub total_count: u64,
    /// Page size `M`
    pub page_size: u64,
    /// Policy the plan was derived with
    pub policy: PagingPolicy,
}

impl PagePlan {
    /// Create a plan. A zero page size is treated as one.
    pub fn new(total_count: u64, page_size: u64, policy: PagingPolicy) -> Self {
        Self {
            total_count,
            page_size: page_size.max(1),
            policy,
        }
    }

    /// Requests after the first one
    pub fn follow_up_count(&self) -> u64 {
        match self.policy {
            PagingPolicy::Ceiling => self.total_count.saturating_sub(1) / self.page_size,
            PagingPolicy::Floor => self.total_count / self.page_size,
        }
    }

    /// Requests including the first one
    pub fn request_count(&self) -> u64 {
        self.follow_up_count() + 1
    }

    /// Offset of iteration `iteration`; the first page is iteration 0
    pub fn offset_for(&self, iteration: u64) -> u64 {
        iteration.saturating_mul(self.page_size)
    }

    /// `(iteration, offset)` of each follow-up page, ascending
    pub fn follow_ups(&self) -> impl Iterator<Item = (u64, u64)> {
        let plan = *self;
        (1..=plan.follow_up_count()).map(move |i| (i, plan.offset_for(i)))
    }

    /// Offsets of every request, first page included
    pub fn offsets(&self) -> Vec<u64> {
        (0..self.request_count()).map(|i| self.offset_for(i)).collect()
    }

    /// Entities expected in iteration `iteration` if the server honours `M`
    pub fn expected_length(&self, iteration: u64) -> u64 {
        let offset = self.offset_for(iteration);
        self.total_count.saturating_sub(offset).min(self.page_size)
    }
}
