//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Validation results with per-entry overview
//! - Resolved schedules with next run times
//! - Planned proposals with member updates and change types
//! - Summary line with deferred and ignored counts

use crate::config::{EcosystemDeclaration, UpdateConfig};
use crate::domain::{
    DeclarationPlan, DependencyUpdate, Ecosystem, PlanSummary, UpdateProposal, UpdateType,
};
use crate::error::ConfigError;
use crate::output::{OutputFormatter, Verbosity};
use crate::schedule::ScheduleEntry;
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Colored label for a change type
    fn update_type_label(&self, update: &DependencyUpdate) -> String {
        match update.update_type() {
            Some(UpdateType::Major) => self.paint("major", |s| s.red().bold()),
            Some(UpdateType::Minor) => self.paint("minor", |s| s.yellow()),
            Some(UpdateType::Patch) => self.paint("patch", |s| s.green()),
            None => self.paint("?", |s| s.dimmed()),
        }
    }

    fn heading(&self, ecosystem: Ecosystem, directory: &str, branch: Option<&str>) -> String {
        let mut heading = format!("{} in {}", ecosystem.display_name(), directory);
        if let Some(branch) = branch {
            heading.push_str(&format!(" on {}", branch));
        }
        self.paint(&heading, |s| s.bold())
    }

    fn describe_declaration(&self, declaration: &EcosystemDeclaration) -> Vec<String> {
        let mut lines = vec![format!(
            "schedule: {}",
            declaration.schedule.recurrence().description()
        )];
        if !declaration.labels.is_empty() {
            let labels: Vec<&str> = declaration.labels.iter().map(String::as_str).collect();
            lines.push(format!("labels: {}", labels.join(", ")));
        }
        if !declaration.groups.is_empty() {
            let groups: Vec<&str> = declaration.groups.keys().map(String::as_str).collect();
            lines.push(format!("groups: {}", groups.join(", ")));
        }
        if !declaration.ignore.is_empty() {
            let ignored: Vec<&str> = declaration
                .ignore
                .iter()
                .map(|rule| rule.dependency_name.as_str())
                .collect();
            lines.push(format!("ignore: {}", ignored.join(", ")));
        }
        lines.push(format!(
            "open pull request limit: {}",
            declaration.pull_request_limit()
        ));
        lines
    }

    fn write_proposal(
        &self,
        proposal: &UpdateProposal,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let bullet = self.paint("●", |s| s.cyan());
        let mut line = format!("  {} {}", bullet, proposal.title());
        if !proposal.labels.is_empty() {
            line.push_str(&format!(" [{}]", proposal.labels.join(", ")));
        }
        writeln!(writer, "{}", line)?;

        if proposal.is_grouped() || self.verbosity == Verbosity::Verbose {
            for member in &proposal.members {
                writeln!(
                    writer,
                    "      {} {} -> {} ({})",
                    member.name,
                    member.current_version,
                    member.latest_version,
                    self.update_type_label(member)
                )?;
            }
        }
        Ok(())
    }

    fn write_plan(&self, plan: &DeclarationPlan, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}",
            self.heading(
                plan.ecosystem,
                &plan.directory,
                plan.target_branch.as_deref()
            )
        )?;

        if plan.proposals.is_empty() {
            writeln!(writer, "  {}", self.paint("no proposals", |s| s.dimmed()))?;
        }
        for proposal in &plan.proposals {
            self.write_proposal(proposal, writer)?;
        }

        if !plan.deferred.is_empty() {
            writeln!(
                writer,
                "  {} {} proposal(s) deferred by the open pull request limit",
                self.paint("!", |s| s.yellow()),
                plan.deferred.len()
            )?;
            if self.verbosity == Verbosity::Verbose {
                for proposal in &plan.deferred {
                    writeln!(writer, "      {}", proposal.title())?;
                }
            }
        }

        if !plan.ignored.is_empty() && self.verbosity == Verbosity::Verbose {
            let names: Vec<&str> = plan.ignored.iter().map(|u| u.name.as_str()).collect();
            writeln!(
                writer,
                "  {} ignored: {}",
                self.paint("-", |s| s.dimmed()),
                names.join(", ")
            )?;
        }

        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format_validation(
        &self,
        config: &UpdateConfig,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} configuration is valid: {} update entr{}",
            self.paint("✓", |s| s.green()),
            config.updates.len(),
            if config.updates.len() == 1 { "y" } else { "ies" }
        )?;

        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        for (index, declaration) in config.updates.iter().enumerate() {
            writeln!(
                writer,
                "[{}] {}",
                index,
                self.heading(
                    declaration.ecosystem,
                    &declaration.directory,
                    declaration.target_branch.as_deref()
                )
            )?;
            if self.verbosity == Verbosity::Verbose {
                for line in self.describe_declaration(declaration) {
                    writeln!(writer, "    {}", line)?;
                }
            }
        }

        Ok(())
    }

    fn format_config_error(
        &self,
        error: &ConfigError,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "{} {}", self.paint("✗", |s| s.red().bold()), error)
    }

    fn format_schedule(
        &self,
        entries: &[ScheduleEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for entry in entries {
            let next = entry
                .next_run
                .map(|next| next.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string());

            if self.verbosity == Verbosity::Quiet {
                writeln!(writer, "[{}] {}", entry.index, next)?;
                continue;
            }

            writeln!(
                writer,
                "[{}] {}: {} (next: {})",
                entry.index,
                self.heading(
                    entry.ecosystem,
                    &entry.directory,
                    entry.target_branch.as_deref()
                ),
                entry.rule.description(),
                self.paint(&next, |s| s.cyan())
            )?;
        }
        Ok(())
    }

    fn format_plan(&self, summary: &PlanSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for plan in &summary.plans {
                if !plan.has_proposals()
                    && plan.deferred.is_empty()
                    && self.verbosity != Verbosity::Verbose
                {
                    continue;
                }
                self.write_plan(plan, writer)?;
            }

            for unmatched in &summary.unmatched {
                writeln!(
                    writer,
                    "{} no update entry covers {}",
                    self.paint("!", |s| s.yellow()),
                    unmatched
                )?;
            }
        }

        let mut line = format!(
            "{} proposal(s) covering {} update(s)",
            summary.total_proposals(),
            summary.total_updates()
        );
        if summary.total_deferred() > 0 {
            line.push_str(&format!(", {} deferred", summary.total_deferred()));
        }
        if summary.total_ignored() > 0 {
            line.push_str(&format!(", {} ignored", summary.total_ignored()));
        }
        writeln!(writer, "{}", self.paint(&line, |s| s.bold()))
    }
}
