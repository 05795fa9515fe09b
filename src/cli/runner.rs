//! CLI runner - executes commands

use crate::classify::PageResult;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ConfigFile};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, HttpTransport};
use crate::pagination::{PagePlan, PagingPolicy, SweepReport, Sweeper};
use crate::request::ResourceKind;
use crate::types::TlsMode;
use serde_json::json;
use std::io;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                kind,
                page_size,
                policy,
                concurrency,
                summary,
            } => {
                self.list(kind.as_deref(), *page_size, *policy, *concurrency, *summary)
                    .await
            }
            Commands::Count { kind } => self.count(kind.as_deref()).await,
        }
    }

    /// Load the parameter file and apply global flags
    fn load_config(&self) -> Result<ConfigFile> {
        let mut config = load_config(&self.cli.config)?;
        if self.cli.insecure {
            config.tls = TlsMode::TrustAll;
        }
        Ok(config)
    }

    fn resolve_password(&self, config: &ConfigFile) -> Result<String> {
        resolve_password(self.cli.password.as_deref(), config, |prompt| {
            rpassword::prompt_password(prompt)
        })
    }

    fn resolve_kind(kind: Option<&str>, config: &ConfigFile) -> Result<ResourceKind> {
        ResourceKind::new(kind.unwrap_or(config.kind.as_str()))
    }

    fn build_sweeper(&self, config: &ConfigFile) -> Result<Sweeper<HttpTransport>> {
        let password = self.resolve_password(config)?;
        let endpoint = config.endpoint(password)?;

        let mut client_config = HttpClientConfig::builder();
        if let Some(rate_limit) = config.rate_limit() {
            client_config = client_config.rate_limit(rate_limit);
        }
        let transport = HttpTransport::with_config(&endpoint, client_config.build())
            .context("Failed to build HTTP client")?;

        debug!(base_url = %endpoint.base_url(), tls = ?endpoint.tls_mode(), "endpoint ready");
        Sweeper::new(transport, endpoint).with_settings(config.sweep_settings())
    }

    /// Run a full sweep
    async fn list(
        &self,
        kind: Option<&str>,
        page_size: Option<u64>,
        policy: Option<PagingPolicy>,
        concurrency: Option<usize>,
        summary: bool,
    ) -> Result<()> {
        let config = self.load_config()?;
        let kind = Self::resolve_kind(kind, &config)?;

        let mut settings = config.sweep_settings();
        if let Some(page_size) = page_size {
            settings = settings.with_page_size(page_size);
        }
        if let Some(policy) = policy {
            settings = settings.with_policy(policy);
        }
        if let Some(concurrency) = concurrency {
            settings = settings.with_concurrency(concurrency);
        }
        if summary {
            settings = settings.with_collect_entities(false);
        }
        let sweeper = self.build_sweeper(&config)?.with_settings(settings)?;
        let report = sweeper.sweep(&kind).await;

        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Pretty => {
                for line in report_lines(&report) {
                    println!("{line}");
                }
            }
        }

        report.into_result().map(|_| ())
    }

    /// Probe the first page only
    async fn count(&self, kind: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let kind = Self::resolve_kind(kind, &config)?;
        let sweeper = self.build_sweeper(&config)?;

        let page = match sweeper.probe(&kind).await {
            PageResult::Success(page) => page,
            PageResult::Failure(failure) => {
                return Err(Error::sweep_failed(kind.as_str(), 0, failure.to_string()))
            }
        };

        let settings = sweeper.settings();
        let plan = PagePlan::new(page.total_matches, settings.page_size, settings.policy);

        match self.cli.format {
            OutputFormat::Json => {
                let out = json!({
                    "kind": kind,
                    "total_matches": page.total_matches,
                    "first_page_length": page.length,
                    "planned_requests": plan.request_count(),
                    "offsets": plan.offsets(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Pretty => {
                println!("Total {kind} entities reported: {}", page.total_matches);
                println!(
                    "Requests needed at page size {}: {}",
                    plan.page_size,
                    plan.request_count()
                );
            }
        }
        Ok(())
    }
}

/// Password from the flag or environment, then the file, then `prompt`.
///
/// `prompt` talks to the terminal, never stdout, so JSON output stays parseable.
pub(crate) fn resolve_password<F>(
    flag: Option<&str>,
    config: &ConfigFile,
    prompt: F,
) -> Result<String>
where
    F: FnOnce(&str) -> io::Result<String>,
{
    if let Some(password) = flag {
        return Ok(password.to_string());
    }
    if let Some(password) = &config.password {
        return Ok(password.clone());
    }

    let username = config.username.as_deref().unwrap_or_default();
    prompt(&format!("Password for {username}: ")).context("Failed to read password")
}

/// Human-readable lines for a sweep report
pub(crate) fn report_lines(report: &SweepReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| {
            format!(
                "Total entities in this request (iteration #{}): {}",
                page.iteration, page.length
            )
        })
        .collect();

    if let Some(total) = report.total_reported {
        lines.push(format!("Total {} entities reported: {total}", report.kind));
    }
    lines.push(format!(
        "Total {} entities retrieved: {}",
        report.kind,
        report.accumulated()
    ));

    if let Some(failure) = &report.failure {
        lines.push(format!("Sweep stopped at {failure}"));
    } else if !report.is_complete() {
        lines.push("Warning: retrieved count differs from the reported total".to_string());
    }

    lines
}
