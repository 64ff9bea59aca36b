//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of validation, schedule and plan results
//! - Structured per-declaration proposal information

use crate::config::UpdateConfig;
use crate::domain::{DeclarationPlan, DependencyUpdate, PlanSummary, UpdateProposal};
use crate::error::ConfigError;
use crate::output::{OutputFormatter, Verbosity};
use crate::schedule::ScheduleEntry;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a validation result
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonValidation {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entries: Vec<JsonEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

/// JSON representation of one update entry
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonEntry {
    index: usize,
    ecosystem: String,
    directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_branch: Option<String>,
    interval: String,
    labels: Vec<String>,
    groups: Vec<String>,
    open_pull_requests_limit: u32,
}

/// JSON representation of a configuration error
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<usize>,
    /// `package-ecosystem` of the entry as written
    #[serde(skip_serializing_if = "Option::is_none")]
    ecosystem: Option<String>,
}

/// JSON representation of a resolved schedule
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonSchedule {
    index: usize,
    ecosystem: String,
    directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_branch: Option<String>,
    interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    day: Option<String>,
    time: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_run: Option<String>,
}

/// JSON representation of a planning run
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonPlanOutput<'a> {
    summary: JsonPlanSummary,
    plans: Vec<JsonDeclarationPlan<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unmatched: Vec<String>,
}

/// JSON representation of plan totals
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonPlanSummary {
    proposals: usize,
    updates: usize,
    deferred: usize,
    ignored: usize,
}

/// JSON representation of one declaration's plan
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonDeclarationPlan<'a> {
    index: usize,
    ecosystem: String,
    directory: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_branch: Option<&'a str>,
    proposals: Vec<JsonProposal<'a>>,
    /// Deferred proposals (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deferred: Vec<JsonProposal<'a>>,
    /// Ignored updates (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ignored: Vec<&'a DependencyUpdate>,
}

/// JSON representation of a proposal
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonProposal<'a> {
    title: String,
    #[serde(flatten)]
    proposal: &'a UpdateProposal,
}

impl JsonFormatter {
    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }

    fn proposal_to_json(proposal: &UpdateProposal) -> JsonProposal<'_> {
        JsonProposal {
            title: proposal.title(),
            proposal,
        }
    }

    fn plan_to_json<'a>(&self, plan: &'a DeclarationPlan) -> JsonDeclarationPlan<'a> {
        let verbose = self.verbosity == Verbosity::Verbose;
        JsonDeclarationPlan {
            index: plan.index,
            ecosystem: plan.ecosystem.as_str().to_string(),
            directory: &plan.directory,
            target_branch: plan.target_branch.as_deref(),
            proposals: plan.proposals.iter().map(Self::proposal_to_json).collect(),
            deferred: if verbose {
                plan.deferred.iter().map(Self::proposal_to_json).collect()
            } else {
                Vec::new()
            },
            ignored: if verbose {
                plan.ignored.iter().collect()
            } else {
                Vec::new()
            },
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_validation(
        &self,
        config: &UpdateConfig,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let entries = if self.verbosity == Verbosity::Quiet {
            Vec::new()
        } else {
            config
                .updates
                .iter()
                .enumerate()
                .map(|(index, declaration)| JsonEntry {
                    index,
                    ecosystem: declaration.ecosystem.as_str().to_string(),
                    directory: declaration.directory.clone(),
                    target_branch: declaration.target_branch.clone(),
                    interval: declaration.schedule.interval.as_str().to_string(),
                    labels: declaration.labels.iter().cloned().collect(),
                    groups: declaration.groups.keys().cloned().collect(),
                    open_pull_requests_limit: declaration.pull_request_limit(),
                })
                .collect()
        };

        Self::write_json(
            &JsonValidation {
                valid: true,
                version: Some(config.version),
                entries,
                error: None,
            },
            writer,
        )
    }

    fn format_config_error(
        &self,
        error: &ConfigError,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(
            &JsonValidation {
                valid: false,
                version: None,
                entries: Vec::new(),
                error: Some(JsonError {
                    message: error.to_string(),
                    entry: error.entry().map(|e| e.index),
                    ecosystem: error.entry().and_then(|e| e.ecosystem.clone()),
                }),
            },
            writer,
        )
    }

    fn format_schedule(
        &self,
        entries: &[ScheduleEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output: Vec<JsonSchedule> = entries
            .iter()
            .map(|entry| JsonSchedule {
                index: entry.index,
                ecosystem: entry.ecosystem.as_str().to_string(),
                directory: entry.directory.clone(),
                target_branch: entry.target_branch.clone(),
                interval: entry.rule.interval.as_str().to_string(),
                day: entry
                    .rule
                    .weekday
                    .map(|day| crate::schedule::weekday_name(day).to_string()),
                time: entry.rule.time.format("%H:%M").to_string(),
                description: entry.rule.description(),
                next_run: entry.next_run.map(|next| next.to_rfc3339()),
            })
            .collect();

        Self::write_json(&output, writer)
    }

    fn format_plan(&self, summary: &PlanSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonPlanOutput {
            summary: JsonPlanSummary {
                proposals: summary.total_proposals(),
                updates: summary.total_updates(),
                deferred: summary.total_deferred(),
                ignored: summary.total_ignored(),
            },
            plans: summary.plans.iter().map(|p| self.plan_to_json(p)).collect(),
            unmatched: summary.unmatched.clone(),
        };

        Self::write_json(&output, writer)
    }
}
