// metrics.rs - Run statistics and metadata
// Purpose: Derive the summary counters from finished bucket reports and carry
//          the run identity and timing written into the report.

use crate::orchestrator::BucketReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters derived from a finished run. Never stored on its own: always
/// recomputed from the bucket reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_buckets: usize,
    pub found_buckets: usize,
    pub accessible_urls: usize,
    pub accessible_advanced_urls: usize,
    pub successful_cli: usize,
}

impl RunSummary {
    /// Single pass over the reports
    pub fn from_reports(reports: &[BucketReport]) -> Self {
        reports.iter().fold(
            Self {
                total_buckets: reports.len(),
                ..Self::default()
            },
            |mut summary, report| {
                if report.is_found() {
                    summary.found_buckets += 1;
                }
                summary.accessible_urls += report.accessible_http().count();
                summary.accessible_advanced_urls += report.accessible_advanced().count();
                summary.successful_cli += report.successful_cli().count();
                summary
            },
        )
    }
}

/// Identification and timing for one run, emitted as the report's metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub tool: String,
    pub version: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub total_buckets: usize,
}

impl RunMetadata {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: now,
            generated_at: now,
            duration_seconds: 0.0,
            total_buckets: 0,
        }
    }

    /// Stamp the end of the run
    pub fn finalize(&mut self, total_buckets: usize) {
        self.generated_at = Utc::now();
        self.duration_seconds = (self.generated_at - self.started_at).num_milliseconds() as f64 / 1000.0;
        self.total_buckets = total_buckets;
    }
}
