// aggregator.rs - Whole-run driver
// Purpose: Evaluate names one after another and summarize the run. Parallelism
//          stays inside a single name's probe batch.

use crate::metrics::RunSummary;
use crate::orchestrator::{BucketReport, BucketScanner};
use log::info;

/// Hooks around each name, used by the console front-end
pub trait RunObserver {
    fn name_started(&mut self, _index: usize, _total: usize, _name: &str) {}
    fn name_finished(&mut self, _index: usize, _total: usize, _report: &BucketReport) {}
}

/// Observer that does nothing
pub struct Silent;

impl RunObserver for Silent {}

pub async fn run(scanner: &BucketScanner, names: &[String]) -> (Vec<BucketReport>, RunSummary) {
    run_with(scanner, names, &mut Silent).await
}

pub async fn run_with(
    scanner: &BucketScanner,
    names: &[String],
    observer: &mut dyn RunObserver,
) -> (Vec<BucketReport>, RunSummary) {
    let total = names.len();
    let mut reports = Vec::with_capacity(total);

    for (index, name) in names.iter().enumerate() {
        observer.name_started(index + 1, total, name);
        let report = scanner.evaluate(name).await;
        observer.name_finished(index + 1, total, &report);
        reports.push(report);
    }

    let summary = RunSummary::from_reports(&reports);
    info!(
        "run complete: {}/{} names found",
        summary.found_buckets, summary.total_buckets
    );

    (reports, summary)
}
