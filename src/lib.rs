//! cloudsniff - cloud object-storage exposure prober.
//!
//! Given a candidate bucket/container name, the engine synthesizes every
//! endpoint URL the supported providers might route it under, probes them
//! through a bounded worker pool, ranks the outcomes and optionally
//! cross-checks with the providers' own command-line tools.

pub mod aggregator;
pub mod classifier;
pub mod cli_check;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod parallel_executor;
pub mod probe;
pub mod report_generator;
pub mod targets;
pub mod url_space;
