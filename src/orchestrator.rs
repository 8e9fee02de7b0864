// orchestrator.rs - Per-name evaluation
// Purpose: For one candidate bucket name, probe the baseline and advanced URL
//          sets, run the provider CLI cross-checks, then rank and filter.
// Every step is isolated: a failure in one never aborts the others.

use crate::classifier;
use crate::cli_check::{CliCheckResult, CliRunner, CliStatus, standard_invocations};
use crate::config::ScanConfig;
use crate::parallel_executor::ParallelProbeExecutor;
use crate::probe::ProbeOutcome;
use crate::url_space::{self, ProbeTarget};
use chrono::{DateTime, Utc};
use colored::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything learned about one candidate name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketReport {
    pub bucket: String,
    pub timestamp: DateTime<Utc>,
    pub http_tests: Vec<ProbeOutcome>,
    pub advanced_tests: Vec<ProbeOutcome>,
    pub cli_tests: Vec<CliCheckResult>,
}

impl BucketReport {
    pub fn accessible_http(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.http_tests.iter().filter(|t| t.accessible)
    }

    pub fn accessible_advanced(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.advanced_tests.iter().filter(|t| t.accessible)
    }

    pub fn successful_cli(&self) -> impl Iterator<Item = &CliCheckResult> {
        self.cli_tests.iter().filter(|t| t.success)
    }

    /// At least one accessible URL (either set) or one successful CLI check
    pub fn is_found(&self) -> bool {
        self.accessible_http().next().is_some()
            || self.accessible_advanced().next().is_some()
            || self.successful_cli().next().is_some()
    }
}

pub struct BucketScanner {
    config: ScanConfig,
    pool: ParallelProbeExecutor,
    cli: Arc<dyn CliRunner>,
}

impl BucketScanner {
    pub fn new(config: ScanConfig, pool: ParallelProbeExecutor, cli: Arc<dyn CliRunner>) -> Self {
        Self { config, pool, cli }
    }

    pub async fn evaluate(&self, bucket: &str) -> BucketReport {
        let verbose = self.config.verbose;
        if verbose {
            println!("\n{}", format!("Testing bucket: {}", bucket).magenta().bold());
        }

        let baseline = self.targets(url_space::generate(bucket));
        if verbose {
            println!("{}", format!("Testing {} HTTP URLs...", baseline.len()).cyan());
        }
        let http_tests = self.probe_batch(baseline).await;

        let advanced_tests = if self.config.skip_advanced {
            Vec::new()
        } else {
            let advanced = self.targets(url_space::generate_advanced(bucket));
            if verbose {
                println!("{}", format!("Testing {} provider-specific URLs...", advanced.len()).cyan());
            }
            self.probe_batch(advanced).await
        };

        let cli_tests = if self.config.skip_cli {
            Vec::new()
        } else {
            self.run_cli_checks(bucket).await
        };

        let mut http_tests = classifier::rank(http_tests);
        let mut advanced_tests = classifier::rank(advanced_tests);

        if let Some(filter) = &self.config.status_filter {
            http_tests = filter.apply(http_tests);
            advanced_tests = filter.apply(advanced_tests);
        }

        info!(
            "{}: {} accessible URLs, {} accessible advanced URLs, {} CLI successes",
            bucket,
            http_tests.iter().filter(|t| t.accessible).count(),
            advanced_tests.iter().filter(|t| t.accessible).count(),
            cli_tests.iter().filter(|t| t.success).count()
        );

        BucketReport {
            bucket: bucket.to_string(),
            timestamp: Utc::now(),
            http_tests,
            advanced_tests,
            cli_tests,
        }
    }

    fn targets(&self, targets: Vec<ProbeTarget>) -> Vec<ProbeTarget> {
        targets
            .into_iter()
            .map(|t| t.with_method(self.config.method))
            .collect()
    }

    async fn probe_batch(&self, targets: Vec<ProbeTarget>) -> Vec<ProbeOutcome> {
        if self.config.verbose {
            self.pool.probe_all_with(targets, print_live_outcome).await
        } else {
            self.pool.probe_all(targets).await
        }
    }

    /// Sequential on purpose: the tools share local credentials and config state
    async fn run_cli_checks(&self, bucket: &str) -> Vec<CliCheckResult> {
        let mut results = Vec::new();

        for invocation in standard_invocations(bucket, self.config.aws_profile.as_deref()) {
            if self.config.verbose {
                println!("\n{}", format!("Testing {}...", invocation.label).blue().bold());
            }

            let result = self.cli.run(&invocation).await;

            match &result.status {
                CliStatus::Success => info!("{} succeeded for {}", invocation.label, bucket),
                CliStatus::NonZeroExit { code } => {
                    info!("{} exited with {} for {}", invocation.label, code, bucket)
                }
                CliStatus::Timeout => warn!("{} timed out for {}", invocation.label, bucket),
                CliStatus::InvocationError { message } => {
                    warn!("{} could not run: {}", invocation.label, message)
                }
            }

            if self.config.verbose {
                if result.success {
                    println!("{}", format!("{}: OK", invocation.label).green());
                } else {
                    println!("{}", format!("{}: ERROR", invocation.label).red());
                }
            }

            results.push(result);
        }

        results
    }
}

/// Verbose mode prints accessible outcomes the moment they complete
fn print_live_outcome(outcome: &ProbeOutcome) {
    if !outcome.accessible {
        return;
    }
    if let Some(status) = outcome.status_code {
        let line = format!("[{}] {} ({}ms)", status, outcome.url, outcome.response_time_ms());
        println!("{}", status_colored(status, &line));
    }
}

/// 2xx green, 3xx/4xx yellow, everything else red
pub fn status_colored(status: u16, text: &str) -> ColoredString {
    match status {
        200..=299 => text.green(),
        300..=499 => text.yellow(),
        _ => text.red(),
    }
}
