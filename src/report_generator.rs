// report_generator.rs - Run report output
// Purpose: Serialize a finished run to JSON and render the console summary.
// Features:
//  - JSON document: metadata block, summary counters, per-bucket results
//  - Timestamped default file name when no output path is given
//  - Text report grouping accessible URLs by status code

use crate::metrics::{RunMetadata, RunSummary};
use crate::orchestrator::{BucketReport, status_colored};
use crate::probe::ProbeOutcome;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// URLs listed per status group in the text report
const URLS_PER_STATUS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub metadata: RunMetadata,
    pub summary: RunSummary,
    pub results: Vec<BucketReport>,
}

impl ReportDocument {
    pub fn new(metadata: RunMetadata, results: Vec<BucketReport>) -> Self {
        let summary = RunSummary::from_reports(&results);
        Self {
            metadata,
            summary,
            results,
        }
    }
}

pub fn default_output_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("cloudsniff_results_{}.json", now.format("%Y%m%d_%H%M%S")))
}

/// Write the report, synthesizing a timestamped name when `output` is None.
/// Returns the path actually written.
pub fn save_json_report(document: &ReportDocument, output: Option<&Path>) -> Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(document.metadata.generated_at),
    };

    let json = serde_json::to_string_pretty(document).context("Failed to serialize report")?;
    fs::write(&path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

pub fn load_json_report(path: &Path) -> Result<ReportDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid report file {}", path.display()))
}

/// Console report: found buckets with their URLs grouped by status, then statistics
pub fn render_text_report(reports: &[BucketReport]) -> String {
    let summary = RunSummary::from_reports(reports);
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", rule.magenta().bold());
    let _ = writeln!(out, "{}", "                   RESULTS REPORT".magenta().bold());
    let _ = writeln!(out, "{}", rule.magenta().bold());

    for report in reports.iter().filter(|r| r.is_found()) {
        let _ = writeln!(out, "\n{}", format!("BUCKET: {}", report.bucket).blue().bold());

        let accessible: Vec<&ProbeOutcome> = report
            .accessible_http()
            .chain(report.accessible_advanced())
            .collect();

        if !accessible.is_empty() {
            let _ = writeln!(out, "   {}:", format!("URLs found ({})", accessible.len()).cyan());
            for (status, group) in group_by_status(&accessible) {
                let header = format!("[{}] ({} URLs)", status, group.len());
                let _ = writeln!(out, "     {}", status_colored(status, &header));
                for outcome in group.iter().take(URLS_PER_STATUS) {
                    let _ = writeln!(out, "       {}", outcome.url);
                }
                if group.len() > URLS_PER_STATUS {
                    let _ = writeln!(out, "       ... and {} more URLs", group.len() - URLS_PER_STATUS);
                }
            }
        }

        let successful: Vec<_> = report.successful_cli().collect();
        if !successful.is_empty() {
            let _ = writeln!(out, "   {}:", format!("CLI commands ({})", successful.len()).cyan());
            for check in successful {
                let _ = writeln!(out, "     {}", check.command.green());
            }
        }
    }

    let _ = writeln!(out, "\n{}:", "STATISTICS".magenta().bold());
    let _ = writeln!(out, "   Buckets tested: {}", summary.total_buckets.to_string().bold());
    let _ = writeln!(out, "   Buckets found: {}", summary.found_buckets.to_string().green());
    let _ = writeln!(out, "   Accessible URLs: {}", summary.accessible_urls.to_string().green());
    let _ = writeln!(
        out,
        "   Accessible advanced URLs: {}",
        summary.accessible_advanced_urls.to_string().green()
    );
    let _ = writeln!(out, "   CLI successes: {}", summary.successful_cli.to_string().green());

    if summary.found_buckets == 0 {
        let _ = writeln!(out, "\n{}", "No accessible buckets found.".red());
    }

    out
}

fn group_by_status<'a>(outcomes: &[&'a ProbeOutcome]) -> BTreeMap<u16, Vec<&'a ProbeOutcome>> {
    let mut groups: BTreeMap<u16, Vec<&'a ProbeOutcome>> = BTreeMap::new();
    for outcome in outcomes.iter().copied() {
        if let Some(status) = outcome.status_code {
            groups.entry(status).or_default().push(outcome);
        }
    }
    groups
}
