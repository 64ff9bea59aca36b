//! CLI argument parsing module for depgroup

use crate::config::DEFAULT_CONFIG_PATH;
use crate::domain::Ecosystem;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Parse an ecosystem identifier such as `npm` or `github-actions`
fn parse_ecosystem(s: &str) -> Result<Ecosystem, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("unknown package ecosystem: {}", s))
}

/// Parse an RFC 3339 timestamp into UTC
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

/// Dependency-update configuration validator and grouping planner
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depgroup",
    version,
    about = "Dependency-update configuration validator and grouping planner"
)]
pub struct CliArgs {
    /// Configuration file to load
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Restrict to specific ecosystems (can be specified multiple times)
    #[arg(long, global = true, action = ArgAction::Append, value_parser = parse_ecosystem)]
    pub ecosystem: Vec<Ecosystem>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate the configuration file
    Validate,

    /// Show each entry's schedule and next run
    Schedule {
        /// Reference instant for next-run computation (default: now)
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },

    /// Group available updates into proposals
    Plan {
        /// JSON file listing available updates per ecosystem and directory
        #[arg(short, long)]
        updates: PathBuf,
    },

    /// Print the configuration in canonical form
    Fmt {
        /// Rewrite the configuration file in place
        #[arg(short, long)]
        write: bool,
    },
}

impl CliArgs {
    /// Check if any ecosystem filter is specified
    pub fn has_ecosystem_filter(&self) -> bool {
        !self.ecosystem.is_empty()
    }

    /// Check if a specific ecosystem should be processed
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        !self.has_ecosystem_filter() || self.ecosystem.contains(&ecosystem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["depgroup", "validate"]);
        assert_eq!(args.config, PathBuf::from(".github/dependabot.yml"));
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.json);
        assert!(!args.no_color);
        assert!(args.ecosystem.is_empty());
        assert_eq!(args.command, Command::Validate);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["depgroup"]).is_err());
    }

    #[test]
    fn test_config_flag() {
        let args = CliArgs::parse_from(["depgroup", "--config", "ci/deps.yml", "validate"]);
        assert_eq!(args.config, PathBuf::from("ci/deps.yml"));

        let args = CliArgs::parse_from(["depgroup", "validate", "-c", "deps.yml"]);
        assert_eq!(args.config, PathBuf::from("deps.yml"));
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["depgroup", "-q", "validate"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["depgroup", "validate", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_schedule_now() {
        let args = CliArgs::parse_from([
            "depgroup",
            "schedule",
            "--now",
            "2026-03-10T08:00:00+02:00",
        ]);
        let expected = Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap();
        assert_eq!(args.command, Command::Schedule { now: Some(expected) });
    }

    #[test]
    fn test_schedule_now_invalid() {
        let result = CliArgs::try_parse_from(["depgroup", "schedule", "--now", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_requires_updates() {
        assert!(CliArgs::try_parse_from(["depgroup", "plan"]).is_err());

        let args = CliArgs::parse_from(["depgroup", "plan", "-u", "updates.json", "--json"]);
        assert!(args.json);
        assert_eq!(
            args.command,
            Command::Plan {
                updates: PathBuf::from("updates.json")
            }
        );
    }

    #[test]
    fn test_fmt_write() {
        let args = CliArgs::parse_from(["depgroup", "fmt"]);
        assert_eq!(args.command, Command::Fmt { write: false });

        let args = CliArgs::parse_from(["depgroup", "fmt", "-w"]);
        assert_eq!(args.command, Command::Fmt { write: true });
    }

    #[test]
    fn test_ecosystem_filter() {
        let args = CliArgs::parse_from([
            "depgroup",
            "--ecosystem",
            "npm",
            "--ecosystem",
            "github-actions",
            "validate",
        ]);
        assert!(args.has_ecosystem_filter());
        assert!(args.should_process_ecosystem(Ecosystem::Npm));
        assert!(args.should_process_ecosystem(Ecosystem::GithubActions));
        assert!(!args.should_process_ecosystem(Ecosystem::Pip));
    }

    #[test]
    fn test_no_filter_processes_everything() {
        let args = CliArgs::parse_from(["depgroup", "validate"]);
        assert!(!args.has_ecosystem_filter());
        assert!(args.should_process_ecosystem(Ecosystem::Cargo));
    }

    #[test]
    fn test_unknown_ecosystem_rejected() {
        let result = CliArgs::try_parse_from(["depgroup", "--ecosystem", "cobol", "validate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_instant() {
        let instant = parse_instant("2026-03-10T05:00:00Z").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 10, 5, 0, 0).unwrap());
        assert!(parse_instant("").is_err());
    }
}
