//! Rendering of validation, schedule and plan results
//!
//! Two renderers share one trait: a colored text view for terminals and a
//! JSON document for scripts. Both write to any `io::Write`.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::UpdateConfig;
use crate::domain::PlanSummary;
use crate::error::ConfigError;
use crate::schedule::ScheduleEntry;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How much detail to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Summary lines only
    Quiet,
    #[default]
    Normal,
    /// Adds per-member and per-rule detail
    Verbose,
}

impl Verbosity {
    /// Resolve the `--quiet`/`--verbose` pair; quiet takes precedence
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Renderer selection derived from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Text output only; ignored for JSON
    pub color: bool,
}

impl OutputConfig {
    /// Create configuration from CLI flags
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, color: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbosity: Verbosity::from_flags(verbose, quiet),
            color,
        }
    }
}

/// Renders each command's result
pub trait OutputFormatter {
    /// A configuration that loaded cleanly
    fn format_validation(&self, config: &UpdateConfig, writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// A configuration rejected while loading
    fn format_config_error(&self, error: &ConfigError, writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// Resolved schedules, one per entry
    fn format_schedule(&self, entries: &[ScheduleEntry], writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// A planning run
    fn format_plan(&self, summary: &PlanSummary, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Pick the renderer for `config`
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}
