//! depgroup - Dependency-update configuration CLI tool
//!
//! This tool validates a `dependabot.yml`-style configuration, shows the
//! resolved schedules and groups available updates into proposals.

use clap::Parser;
use depgroup::cli::{CliArgs, Command};
use depgroup::config::{contains_comments, load_config, to_yaml, UpdateConfig};
use depgroup::error::{AppError, IoError};
use depgroup::output::{create_formatter, OutputConfig, OutputFormatter};
use depgroup::planner::{load_batches, plan_config_filtered};
use depgroup::schedule::schedule_entries;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when a plan leaves update batches without a matching entry
const EXIT_UNMATCHED: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the flag-derived level
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let output_config =
        OutputConfig::from_cli(args.json, args.verbose, args.quiet, !args.no_color);
    let formatter = create_formatter(output_config);

    tracing::debug!(path = %args.config.display(), "loading configuration");
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(AppError::Config(error)) => {
            let mut stdout = io::stdout().lock();
            formatter.format_config_error(&error, &mut stdout)?;
            stdout.flush()?;
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    match &args.command {
        Command::Validate => {
            let mut stdout = io::stdout().lock();
            formatter.format_validation(&config, &mut stdout)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Schedule { now } => {
            let now = now.unwrap_or_else(chrono::Utc::now);
            let entries: Vec<_> = schedule_entries(&config, now)
                .into_iter()
                .filter(|entry| args.should_process_ecosystem(entry.ecosystem))
                .collect();

            let mut stdout = io::stdout().lock();
            formatter.format_schedule(&entries, &mut stdout)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Plan { updates } => run_plan(&args, &config, updates, formatter.as_ref()),
        Command::Fmt { write } => {
            let yaml = to_yaml(&config)?;
            if *write {
                let original = std::fs::read_to_string(&args.config)
                    .map_err(|e| IoError::read_error(&args.config, e))?;
                if contains_comments(&original) {
                    anyhow::bail!(
                        "{} contains comments that rewriting would drop; run `fmt` without --write and merge by hand",
                        args.config.display()
                    );
                }
                std::fs::write(&args.config, &yaml)
                    .map_err(|e| IoError::write_error(&args.config, e))?;
                if !args.quiet {
                    eprintln!("Wrote {}", args.config.display());
                }
            } else {
                let mut stdout = io::stdout().lock();
                stdout.write_all(yaml.as_bytes())?;
                stdout.flush()?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Plan proposals for the batches listed in `updates`
fn run_plan(
    args: &CliArgs,
    config: &UpdateConfig,
    updates: &std::path::Path,
    formatter: &dyn OutputFormatter,
) -> anyhow::Result<ExitCode> {
    let batches = load_batches(updates)?;
    let summary = plan_config_filtered(config, &batches, |declaration| {
        args.should_process_ecosystem(declaration.ecosystem)
    });

    let mut stdout = io::stdout().lock();
    formatter.format_plan(&summary, &mut stdout)?;
    stdout.flush()?;

    if summary.unmatched.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_UNMATCHED))
    }
}
