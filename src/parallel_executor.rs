// parallel_executor.rs - Bounded parallel probe execution
// Purpose: Fan a batch of candidate URLs out to a fixed-size worker pool and
//          collect every outcome in completion order.
// Guarantees:
//  - At most `workers` probes in flight at once
//  - Exactly one outcome per submitted target, even if a probe task panics

use crate::probe::{ProbeExecutor, ProbeOutcome};
use crate::url_space::ProbeTarget;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::timeout;

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Maximum probes in flight per batch
    pub workers: usize,
    /// Per-probe timeout in seconds. The pool enforces it around every executor
    /// call, so a hung probe still yields a failed outcome.
    pub timeout_secs: u64,
    /// Draw an indicatif bar while a batch runs
    pub show_progress: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: 15,
            timeout_secs: 10,
            show_progress: false,
        }
    }
}

impl ParallelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PARALLEL PROBE EXECUTOR
// ═══════════════════════════════════════════════════════════════════════════

pub struct ParallelProbeExecutor {
    config: ParallelConfig,
    executor: Arc<dyn ProbeExecutor>,
}

impl ParallelProbeExecutor {
    pub fn new(config: ParallelConfig, executor: Arc<dyn ProbeExecutor>) -> Self {
        Self { config, executor }
    }

    /// Probe every target, returning outcomes in completion order
    pub async fn probe_all(&self, targets: Vec<ProbeTarget>) -> Vec<ProbeOutcome> {
        self.probe_all_with(targets, |_| {}).await
    }

    /// Like `probe_all`, calling `on_outcome` for each result as it arrives
    pub async fn probe_all_with<F>(&self, targets: Vec<ProbeTarget>, mut on_outcome: F) -> Vec<ProbeOutcome>
    where
        F: FnMut(&ProbeOutcome),
    {
        if targets.is_empty() {
            return Vec::new();
        }

        let total = targets.len();
        let workers = self.config.workers.max(1);
        let probe_timeout = self.config.timeout();
        debug!("probing {} targets with {} workers", total, workers);

        // The pool lives for exactly one batch.
        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeOutcome>();

        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("    {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} URLs")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };

        let mut handles = Vec::with_capacity(total);

        for target in targets {
            let semaphore = Arc::clone(&semaphore);
            let executor = Arc::clone(&self.executor);
            let tx = tx.clone();
            let task_target = target.clone();

            let handle = tokio::spawn(async move {
                let outcome = match semaphore.acquire().await {
                    Ok(_permit) => match timeout(probe_timeout, executor.probe(&task_target)).await {
                        Ok(outcome) => outcome,
                        Err(_) => ProbeOutcome::failed(
                            &task_target,
                            format!("timeout: no response within {}s", probe_timeout.as_secs()),
                        ),
                    },
                    Err(_) => ProbeOutcome::failed(&task_target, "worker pool closed"),
                };
                // The receiver outlives every worker, so a send error cannot occur.
                let _ = tx.send(outcome);
            });

            handles.push((target, handle));
        }

        // Only the workers hold senders now; the channel closes when the last one ends.
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            if let Some(bar) = &progress {
                bar.inc(1);
            }
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        // Drain the pool. A task that died before sending still owes an outcome.
        for (target, handle) in handles {
            if let Err(e) = handle.await {
                warn!("probe task for {} aborted: {}", target.url, e);
                let outcome = ProbeOutcome::failed(&target, format!("probe task aborted: {}", e));
                on_outcome(&outcome);
                outcomes.push(outcome);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        debug!(
            "batch complete: {}/{} outcomes, {} accessible",
            outcomes.len(),
            total,
            outcomes.iter().filter(|o| o.accessible).count()
        );

        outcomes
    }
}
