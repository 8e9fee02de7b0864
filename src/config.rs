// config.rs - Run configuration
// Purpose: One explicit value, built from the command line, that every engine
//          component receives at construction time.

use crate::classifier::StatusFilter;
use crate::error::InputError;
use crate::parallel_executor::ParallelConfig;
use crate::url_space::ProbeMethod;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 15;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub timeout_secs: u64,
    pub workers: usize,
    pub verbose: bool,
    pub status_filter: Option<StatusFilter>,
    pub aws_profile: Option<String>,
    pub skip_cli: bool,
    pub skip_advanced: bool,
    pub method: ProbeMethod,
    pub output: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
            verbose: false,
            status_filter: None,
            aws_profile: None,
            skip_cli: false,
            skip_advanced: false,
            method: ProbeMethod::Get,
            output: None,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.workers == 0 {
            return Err(InputError::InvalidWorkers);
        }
        if self.timeout_secs == 0 {
            return Err(InputError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pool settings; the progress bar replaces live lines when not verbose
    pub fn parallel(&self) -> ParallelConfig {
        ParallelConfig {
            workers: self.workers,
            timeout_secs: self.timeout_secs,
            show_progress: !self.verbose,
        }
    }
}
