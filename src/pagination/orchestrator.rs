//! Sweep orchestration
//!
//! Drives the request builder, transport and classifier through one sweep.

use super::plan::PagePlan;
use super::report::SweepReport;
use super::types::{CollectionCursor, SweepSettings, SweepState};
use crate::classify::{classify, PageResult};
use crate::config::EndpointConfig;
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::request::{RequestBuilder, ResourceKind};
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Retrieves whole collections page by page
pub struct Sweeper<T: Transport> {
    transport: T,
    endpoint: EndpointConfig,
    settings: SweepSettings,
}

impl<T: Transport> Sweeper<T> {
    /// Create a sweeper with default settings
    pub fn new(transport: T, endpoint: EndpointConfig) -> Self {
        Self {
            transport,
            endpoint,
            settings: SweepSettings::default(),
        }
    }

    /// Replace the settings. Fails if they do not validate.
    pub fn with_settings(mut self, settings: SweepSettings) -> Result<Self> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Current settings
    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Endpoint every request goes to
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Request only the first page
    pub async fn probe(&self, kind: &ResourceKind) -> PageResult {
        let builder = RequestBuilder::new(&self.endpoint);
        self.fetch_page(&builder, kind, 0).await
    }

    /// Retrieve every entity of `kind`.
    ///
    /// Never fails as a whole: page failures end the sweep in
    /// [`SweepState::Failed`] with the pages received so far still in the report.
    pub async fn sweep(&self, kind: &ResourceKind) -> SweepReport {
        let start = Instant::now();
        let page_size = self.settings.page_size;
        let collect = self.settings.collect_entities;
        let builder = RequestBuilder::new(&self.endpoint);
        let mut cursor = CollectionCursor::new(page_size);
        let mut report = SweepReport::new(kind.clone(), &self.settings);

        info!(
            kind = %kind,
            base_url = %self.endpoint.base_url(),
            page_size,
            policy = ?self.settings.policy,
            "starting sweep"
        );

        cursor.advance(SweepState::FirstPageSent);
        let first = match self.fetch_page(&builder, kind, 0).await {
            PageResult::Success(page) => page,
            PageResult::Failure(failure) => {
                warn!(kind = %kind, %failure, "first page failed");
                cursor.record_failure();
                cursor.advance(SweepState::Failed);
                report.fail(0, 0, failure);
                return report.finish(cursor.state(), elapsed_ms(start));
            }
        };

        let total = first.total_matches;
        let plan = PagePlan::new(total, page_size, self.settings.policy);
        cursor.record_first_page(total, first.length);
        cursor.advance(SweepState::CountKnown);
        report.total_reported = Some(total);
        report.planned_requests = Some(plan.request_count());

        info!(
            kind = %kind,
            total_matches = total,
            length = first.length,
            requests = plan.request_count(),
            "iteration #0 received"
        );
        report.push_page(0, 0, first, collect);

        if plan.follow_up_count() > 0 {
            let concurrency = self.settings.concurrency;
            let builder = &builder;
            let pages = futures::stream::iter(plan.follow_ups())
                .map(|(iteration, offset)| async move {
                    let result = self.fetch_page(builder, kind, offset).await;
                    (iteration, offset, result)
                })
                .buffered(concurrency);
            let mut pages = std::pin::pin!(pages);

            while let Some((iteration, offset, result)) = pages.next().await {
                cursor.begin_iteration(iteration);
                cursor.advance(SweepState::Paging);

                match result {
                    PageResult::Success(page) => {
                        if page.total_matches != total {
                            warn!(
                                iteration,
                                first = total,
                                now = page.total_matches,
                                "total_matches changed during sweep"
                            );
                        }
                        let expected = plan.expected_length(iteration);
                        if page.length < expected {
                            warn!(
                                iteration,
                                offset,
                                length = page.length,
                                expected,
                                "short page, server may cap pages below page_size"
                            );
                        }
                        debug!(iteration, offset, length = page.length, "page received");

                        cursor.record_page(page.length);
                        cursor.advance(SweepState::CountKnown);
                        report.push_page(iteration, offset, page, collect);
                    }
                    PageResult::Failure(failure) => {
                        warn!(iteration, offset, %failure, "page failed, stopping sweep");
                        cursor.record_failure();
                        cursor.advance(SweepState::Failed);
                        report.fail(iteration, offset, failure);
                        return report.finish(cursor.state(), elapsed_ms(start));
                    }
                }
            }
        }

        cursor.advance(SweepState::Done);
        if cursor.accumulated != total {
            warn!(
                kind = %kind,
                accumulated = cursor.accumulated,
                total_matches = total,
                "sweep finished but page lengths do not add up to the reported total"
            );
        }
        info!(
            kind = %kind,
            accumulated = cursor.accumulated,
            total_matches = total,
            requests = cursor.requests_completed(),
            "sweep done"
        );

        report.finish(cursor.state(), elapsed_ms(start))
    }

    async fn fetch_page(
        &self,
        builder: &RequestBuilder<'_>,
        kind: &ResourceKind,
        offset: u64,
    ) -> PageResult {
        let descriptor = builder.build(kind, self.settings.page_size, offset);
        match self.transport.send(&descriptor).await {
            Ok(raw) => classify(&raw),
            Err(e) => e.into(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for Sweeper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("endpoint", &self.endpoint)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Sweep `kind` over HTTPS with default settings
pub async fn fetch_all_entities(
    endpoint: &EndpointConfig,
    kind: &ResourceKind,
) -> Result<SweepReport> {
    fetch_all_entities_with(endpoint, kind, SweepSettings::default()).await
}

/// Sweep `kind` over HTTPS with the given settings
pub async fn fetch_all_entities_with(
    endpoint: &EndpointConfig,
    kind: &ResourceKind,
    settings: SweepSettings,
) -> Result<SweepReport> {
    settings.validate()?;
    let transport = HttpTransport::new(endpoint)?;
    let sweeper = Sweeper::new(transport, endpoint.clone()).with_settings(settings)?;
    Ok(sweeper.sweep(kind).await)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
