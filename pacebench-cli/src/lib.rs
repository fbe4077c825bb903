#![warn(missing_docs)]
//! PaceBench CLI Library
//!
//! This module provides the CLI infrastructure for harness binaries.
//! Register workloads explicitly, then hand the registry to
//! [`run`] in your main function.
//!
//! # Example
//!
//! ```ignore
//! use pacebench::prelude::*;
//!
//! fn main() -> anyhow::Result<std::process::ExitCode> {
//!     let mut registry = WorkloadRegistry::new();
//!     registry.register(FixtureWorkload::simple("sum", || (1..=1000u64).sum::<u64>()))?;
//!     pacebench_cli::run(registry)
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionOutcome, ExecutionResult, Executor, build_report, build_report_meta,
    compute_statistics, report_config,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::{Parser, Subcommand};
use pacebench_core::{IterationMode, ScheduleConfig, WorkloadRegistry, tracking_active};
use pacebench_report::{OutputFormat, Report};
use pacebench_stats::OutlierPolicy;
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// PaceBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "pacebench")]
#[command(author, version, about = "PaceBench - micro-benchmark harness")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter workloads by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Run workloads for this group only
    #[arg(long)]
    pub group: Option<String>,

    /// Warmup iterations discarded before measurement
    #[arg(long)]
    pub warmup: Option<u64>,

    /// Measured iterations (upper bound in time-boxed mode)
    #[arg(long, short = 'n')]
    pub samples: Option<u64>,

    /// Time budget for the measured phase (e.g. "2s", "500ms")
    #[arg(long)]
    pub budget: Option<String>,

    /// Iteration mode: fixed-count or time-boxed
    #[arg(long)]
    pub mode: Option<IterationMode>,

    /// Actions per timing window
    #[arg(long)]
    pub batch_size: Option<u64>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover pace.toml upwards)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress bar and informational logs
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Exit non-zero if any workload failed or was skipped
    #[arg(long)]
    pub strict: bool,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,

    /// Print a default pace.toml and exit
    #[arg(long)]
    pub init: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered workloads
    List,
    /// Run workloads (default)
    Run,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Scheduling policy
    pub schedule: ScheduleConfig,
    /// Outlier policy for statistics
    pub policy: OutlierPolicy,
    /// Output format
    pub format: OutputFormat,
    /// Regex on workload names
    pub filter: Option<Regex>,
    /// Group restriction
    pub group: Option<String>,
    /// Show a progress bar while running
    pub show_progress: bool,
}

impl RunSettings {
    /// Layer built-in defaults, `pace.toml` and CLI flags (highest wins).
    pub fn resolve(cli: &Cli, mut config: PaceConfig) -> anyhow::Result<Self> {
        if let Some(warmup) = cli.warmup {
            config.runner.warmup_count = warmup;
        }
        if let Some(samples) = cli.samples {
            config.runner.measured_count = samples;
        }
        if let Some(budget) = &cli.budget {
            config.runner.time_budget = budget.clone();
        }
        if let Some(mode) = cli.mode {
            config.runner.mode = mode;
        }
        if let Some(batch_size) = cli.batch_size {
            config.runner.batch_size = batch_size;
        }
        if let Some(format) = &cli.format {
            config.output.format = format.clone();
        }

        let schedule = config.schedule()?;
        let policy = config.outlier_policy()?;
        let format: OutputFormat = config
            .output
            .format
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let filter = Regex::new(&cli.filter)
            .map_err(|e| anyhow::anyhow!("invalid filter `{}`: {}", cli.filter, e))?;

        Ok(Self {
            schedule,
            policy,
            format,
            filter: Some(filter),
            group: cli.group.clone(),
            show_progress: !cli.quiet,
        })
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            policy: OutlierPolicy::default(),
            format: OutputFormat::Human,
            filter: None,
            group: None,
            show_progress: false,
        }
    }
}

/// Run the PaceBench CLI over `registry` with process arguments.
/// This is the main entry point for harness binaries.
pub fn run(registry: WorkloadRegistry) -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    run_with_cli(cli, registry)
}

/// Run the PaceBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, mut registry: WorkloadRegistry) -> anyhow::Result<ExitCode> {
    init_logging(&cli);

    if cli.init {
        print!("{}", PaceConfig::default_toml());
        return Ok(ExitCode::SUCCESS);
    }

    // Explicit --config must load; otherwise discover pace.toml upwards
    let config = match &cli.config {
        Some(path) => PaceConfig::load(path)?,
        None => match PaceConfig::discover()? {
            Some((path, config)) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                config
            }
            None => PaceConfig::default(),
        },
    };
    let settings = RunSettings::resolve(&cli, config)?;

    match cli.command {
        Some(Commands::List) => {
            list_workloads(&registry, &settings);
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run) | None => {
            if cli.threads > 0 {
                // Configure Rayon thread pool for statistics computation
                ThreadPoolBuilder::new()
                    .num_threads(cli.threads)
                    .build_global()
                    .ok();
            }
            let report = run_suite(&mut registry, &settings);
            write_output(&report, settings.format, cli.output.as_ref())?;
            Ok(exit_code(&report, cli.strict))
        }
    }
}

/// Failed or skipped rows only change the exit status under `--strict`.
fn exit_code(report: &Report, strict: bool) -> ExitCode {
    if strict && report.has_failures() {
        tracing::warn!(
            failed = report.summary.failed,
            skipped = report.summary.skipped,
            "strict mode: run had failures"
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(cli: &Cli) {
    let default_directive = if cli.verbose {
        "pacebench=debug"
    } else if cli.quiet {
        "pacebench=warn"
    } else {
        "pacebench=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Plan, execute and summarize. Never prints; the caller renders the report.
pub fn run_suite(registry: &mut WorkloadRegistry, settings: &RunSettings) -> Report {
    let plan = build_plan(registry, settings.filter.as_ref(), settings.group.as_deref());
    let schedule = &settings.schedule;

    tracing::info!(
        "Running {} of {} workloads ({}, {} warmup, {} measured, budget {:?})",
        plan.len(),
        registry.len(),
        schedule.mode,
        schedule.warmup_count,
        schedule.measured_count,
        schedule.time_budget
    );

    let start_time = Instant::now();
    let executor = Executor::new(schedule.clone()).with_progress(settings.show_progress);
    let results = executor.execute(registry, &plan.indices);

    let stats = compute_statistics(&results, settings.policy);
    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let meta = build_report_meta(report_config(schedule, settings.policy));
    let report = build_report(&results, stats, meta, total_duration_ms);

    // Warn if allocation tracking is enabled but nothing could be recorded
    if schedule.track_allocations && !tracking_active() && !report.results.is_empty() {
        tracing::warn!(
            "allocation tracking enabled but TrackingAllocator is not the global allocator; \
             alloc/iter will read 0"
        );
    }

    report
}

fn list_workloads(registry: &WorkloadRegistry, settings: &RunSettings) {
    println!("PaceBench Plan:");

    let plan = build_plan(registry, settings.filter.as_ref(), settings.group.as_deref());
    let selected: Vec<_> = registry
        .all()
        .enumerate()
        .filter(|(i, _)| plan.indices.contains(i))
        .map(|(_, w)| w)
        .collect();

    // Groups in order of first registration
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for workload in &selected {
        match groups.iter_mut().find(|(g, _)| *g == workload.group()) {
            Some((_, names)) => names.push(workload.name()),
            None => groups.push((workload.group(), vec![workload.name()])),
        }
    }

    for (group, names) in &groups {
        println!("├── group: {}", group);
        for name in names {
            println!("│   ├── {}", name);
        }
    }

    println!("{} workloads found.", selected.len());
}

fn write_output(
    report: &Report,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let rendered = format.render(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacebench_core::FixtureWorkload;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pacebench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = parse(&[
            "--warmup", "2", "--samples", "7", "--mode", "fixed-count", "--budget", "250ms",
            "--format", "json",
        ]);
        let mut config = PaceConfig::default();
        config.runner.warmup_count = 50;
        config.runner.batch_size = 4;

        let settings = RunSettings::resolve(&cli, config).unwrap();
        assert_eq!(settings.schedule.warmup_count, 2);
        assert_eq!(settings.schedule.measured_count, 7);
        assert_eq!(settings.schedule.mode, IterationMode::FixedCount);
        assert_eq!(settings.schedule.time_budget, std::time::Duration::from_millis(250));
        // Not overridden on the command line
        assert_eq!(settings.schedule.batch_size, 4);
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(RunSettings::resolve(&parse(&["--samples", "0"]), PaceConfig::default()).is_err());
        assert!(RunSettings::resolve(&parse(&["--format", "xml"]), PaceConfig::default()).is_err());
        assert!(RunSettings::resolve(&parse(&["("]), PaceConfig::default()).is_err());
        assert!(Cli::try_parse_from(["pacebench", "--mode", "sometimes"]).is_err());
    }

    #[test]
    fn test_list_subcommand_parses() {
        let cli = parse(&["--group", "text", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.group.as_deref(), Some("text"));
    }

    #[test]
    fn test_run_suite_reports_every_selected_workload() {
        let mut registry = WorkloadRegistry::new();
        registry
            .register(FixtureWorkload::simple("keep_me", || 1u8))
            .unwrap();
        registry
            .register(FixtureWorkload::simple("drop_me", || 2u8))
            .unwrap();

        let settings = RunSettings {
            schedule: ScheduleConfig::fixed(1, 4),
            filter: Some(Regex::new("keep").unwrap()),
            ..RunSettings::default()
        };
        let report = run_suite(&mut registry, &settings);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].name, "keep_me");
        assert_eq!(report.results[0].measured_iterations, 4);
        assert_eq!(report.meta.config.mode, "fixed-count");
    }

    #[test]
    fn test_strict_exit_code_tracks_failures() {
        let mut registry = WorkloadRegistry::new();
        registry
            .register(FixtureWorkload::simple("fine", || 1u8))
            .unwrap();
        registry
            .register(FixtureWorkload::fallible("always_fails", || -> anyhow::Result<()> {
                anyhow::bail!("nope")
            }))
            .unwrap();
        let settings = RunSettings {
            schedule: ScheduleConfig::fixed(0, 3),
            ..RunSettings::default()
        };

        let report = run_suite(&mut registry, &settings);
        assert!(report.has_failures());
        assert_eq!(exit_code(&report, true), ExitCode::FAILURE);
        assert_eq!(exit_code(&report, false), ExitCode::SUCCESS);

        let clean = RunSettings {
            filter: Some(Regex::new("^fine$").unwrap()),
            ..settings
        };
        let report = run_suite(&mut registry, &clean);
        assert!(!report.has_failures());
        assert_eq!(exit_code(&report, true), ExitCode::SUCCESS);
    }
}
