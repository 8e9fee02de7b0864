// main.rs - cloudsniff - Cloud Bucket Exposure Prober
// Purpose: Command-line front-end: parse arguments, resolve bucket names,
//          run the probing engine and write the JSON report.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cloudsniff::aggregator::{self, RunObserver};
use cloudsniff::classifier::StatusFilter;
use cloudsniff::cli_check::SystemCliRunner;
use cloudsniff::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, ScanConfig};
use cloudsniff::error::InputError;
use cloudsniff::metrics::RunMetadata;
use cloudsniff::orchestrator::{BucketReport, BucketScanner, status_colored};
use cloudsniff::parallel_executor::ParallelProbeExecutor;
use cloudsniff::probe::HttpProber;
use cloudsniff::report_generator::{ReportDocument, render_text_report, save_json_report};
use cloudsniff::targets;
use cloudsniff::url_space::ProbeMethod;
use colored::*;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::Arc;

/// Accessible URLs echoed per bucket in the compact console view
const PREVIEW_URLS: usize = 3;

/// cloudsniff - find publicly reachable cloud storage buckets
#[derive(Parser, Debug)]
#[command(
    name = "cloudsniff",
    version,
    about = "Probe cloud object-storage providers for a bucket/container name",
    long_about = r#"
Probes AWS S3, Google Cloud Storage, Azure Blob, Firebase, DigitalOcean Spaces,
Linode, Oracle, IBM COS, Backblaze B2, Wasabi, Vultr, Scaleway, OVHcloud and
self-hosted MinIO guesses for every URL form a bucket name may be served under.

Any HTTP status below 500 marks a URL as accessible: even 403/404 proves the
provider routes that name. Treat it as a detection signal, not a severity.

EXAMPLES:

  cloudsniff bucket1 bucket2
  cloudsniff --list buckets.txt
  cloudsniff --list buckets.txt --status 200,403
  cloudsniff examplebucket --workers 30 --timeout 5 --no-cli
"#
)]
struct Args {
    /// Bucket/container names to test
    #[arg(value_name = "BUCKET", help_heading = "Target Options")]
    buckets: Vec<String>,

    /// File with bucket names, one per line (# for comments)
    #[arg(short, long, value_name = "FILE", conflicts_with = "buckets", help_heading = "Target Options")]
    list: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECONDS", help_heading = "Probe Options")]
    timeout: u64,

    /// Concurrent probes per bucket
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, value_name = "N", help_heading = "Probe Options")]
    workers: usize,

    /// HTTP method used for every probe
    #[arg(long, value_enum, default_value_t = MethodArg::Get, help_heading = "Probe Options")]
    method: MethodArg,

    /// Only keep results with these status codes (e.g. 200,403,404)
    #[arg(long, value_name = "CODES", help_heading = "Probe Options")]
    status: Option<String>,

    /// Skip provider-specific endpoints (website, acceleration, API variants, CDN edges)
    #[arg(long, help_heading = "Probe Options")]
    no_advanced: bool,

    /// AWS credential profile for the authenticated `aws s3 ls` check
    #[arg(long, value_name = "PROFILE", help_heading = "CLI Checks")]
    profile: Option<String>,

    /// Skip all provider CLI checks (aws, gsutil, az)
    #[arg(long, help_heading = "CLI Checks")]
    no_cli: bool,

    /// JSON report path (default: cloudsniff_results_<timestamp>.json)
    #[arg(short, long, value_name = "FILE", help_heading = "Output")]
    output: Option<PathBuf>,

    /// Print every accessible URL as it is found
    #[arg(short, long, help_heading = "Output")]
    verbose: bool,

    /// Do not print the banner
    #[arg(long, help_heading = "Output")]
    no_banner: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    Get,
    Head,
}

impl From<MethodArg> for ProbeMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Get => ProbeMethod::Get,
            MethodArg::Head => ProbeMethod::Head,
        }
    }
}

impl Args {
    fn scan_config(&self) -> Result<ScanConfig, InputError> {
        let status_filter = self.status.as_deref().map(str::parse::<StatusFilter>).transpose()?;

        let config = ScanConfig {
            timeout_secs: self.timeout,
            workers: self.workers,
            verbose: self.verbose,
            status_filter,
            aws_profile: self.profile.clone(),
            skip_cli: self.no_cli,
            skip_advanced: self.no_advanced,
            method: self.method.into(),
            output: self.output.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.no_banner {
        print_banner();
    }

    let config = args.scan_config().unwrap_or_else(|e| fatal(e));
    let names = targets::resolve_names(&args.buckets, args.list.as_deref()).unwrap_or_else(|e| fatal(e));

    if let Some(path) = &args.list {
        println!("{}", format!("Loaded {} buckets from {}", names.len(), path.display()).cyan());
    }
    if let Some(filter) = &config.status_filter {
        println!("{}", format!("Filtering by status codes: {}", filter).cyan());
    }

    let prober = HttpProber::new(config.timeout()).context("Failed to build HTTP client")?;
    let pool = ParallelProbeExecutor::new(config.parallel(), Arc::new(prober));
    let cli = Arc::new(SystemCliRunner::new(config.timeout()));
    let scanner = BucketScanner::new(config.clone(), pool, cli);

    println!("{}", "Starting bucket tests...".magenta().bold());
    println!("{}", format!("Buckets to test: {}", names.join(", ")).cyan());

    let mut metadata = RunMetadata::start();
    let mut console = ConsoleObserver { verbose: config.verbose };
    let (reports, summary) = aggregator::run_with(&scanner, &names, &mut console).await;
    metadata.finalize(reports.len());

    if !config.verbose {
        print!("{}", render_text_report(&reports));
    }

    let document = ReportDocument::new(metadata, reports);
    let path = save_json_report(&document, config.output.as_deref())?;

    println!(
        "\n{}",
        format!(
            "{}/{} buckets found. Results saved to: {}",
            summary.found_buckets,
            summary.total_buckets,
            path.display()
        )
        .cyan()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Input errors end the process with a non-zero status
fn fatal(error: InputError) -> ! {
    eprintln!("{}", format!("[!] {}", error).red().bold());
    if matches!(error, InputError::NoTargets) {
        eprintln!("Examples:");
        eprintln!("  cloudsniff bucket1 bucket2");
        eprintln!("  cloudsniff --list buckets.txt");
        eprintln!("  cloudsniff --list buckets.txt --status 200,403");
    }
    std::process::exit(1);
}

/// Compact per-bucket lines; verbose mode already printed everything live
struct ConsoleObserver {
    verbose: bool,
}

impl RunObserver for ConsoleObserver {
    fn name_started(&mut self, index: usize, total: usize, name: &str) {
        if !self.verbose {
            println!("{}", format!("[{}/{}] {}", index, total, name).cyan());
        }
    }

    fn name_finished(&mut self, _index: usize, _total: usize, report: &BucketReport) {
        if self.verbose {
            return;
        }

        if !report.is_found() {
            println!("  {}", "NONE".red());
            return;
        }

        println!("  {}", "FOUND".green().bold());
        let accessible: Vec<_> = report
            .accessible_http()
            .chain(report.accessible_advanced())
            .collect();

        for outcome in accessible.iter().take(PREVIEW_URLS) {
            if let Some(status) = outcome.status_code {
                let line = format!("[{}] {}", status, outcome.url);
                println!("  {}", status_colored(status, &line));
            }
        }
        if accessible.len() > PREVIEW_URLS {
            println!(
                "  {}",
                format!("... and {} more URLs", accessible.len() - PREVIEW_URLS).cyan()
            );
        }
        for check in report.successful_cli() {
            println!("  {}", format!("CLI: {}", check.command).green());
        }
    }
}

fn print_banner() {
    let clouds = r#"
  ____ _                 _ ____        _  __  __     .--.
 / ___| | ___  _   _  __| / ___| _ __ (_)/ _|/ _| .-(    ).
| |   | |/ _ \| | | |/ _` \___ \| '_ \| | |_| |_ (___.__)__)
| |___| | (_) | |_| | (_| |___) | | | | |  _|  _|
 \____|_|\___/ \__,_|\__,_|____/|_| |_|_|_| |_|
"#;
    let block = r#"
   ___  _                _  ___        _   __  __
  / __|| | ___  _  _  __| |/ __| _ _  (_) / _|/ _|
 | (__ | |/ _ \| || |/ _` |\__ \| ' \ | ||  _||  _|
  \___||_|\___/ \_,_|\__,_||___/|_||_||_||_|  |_|
"#;

    let banners = [clouds.magenta().bold(), block.green()];
    if let Some(banner) = banners.choose(&mut rand::thread_rng()) {
        println!("{}", banner);
    }
    println!("{}", format!("Cloud Bucket Tester - v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
}
