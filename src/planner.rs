//! Update planner for turning available updates into proposals
//!
//! This module provides:
//! - Workflow coordination: match batch → ignore → group → limit
//! - Loading the available-updates input file
//! - Reporting of update batches no declaration covers
//!
//! Declarations are evaluated independently and nothing is written; the
//! runner that opens proposals owns everything after planning.

use crate::config::{DeclarationKey, EcosystemDeclaration, UpdateConfig};
use crate::domain::{DeclarationPlan, DependencyUpdate, Ecosystem, PlanSummary, UpdateProposal};
use crate::error::{AppError, InputError, IoError};
use crate::grouping::partition;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Available updates the runner found for one ecosystem and directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateBatch {
    /// Package ecosystem
    pub package_ecosystem: Ecosystem,
    /// Scanned directory
    pub directory: String,
    /// Branch the versions were read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Updates found
    #[serde(default)]
    pub dependencies: Vec<DependencyUpdate>,
}

impl UpdateBatch {
    /// Declaration identity this batch belongs to
    pub fn key(&self) -> DeclarationKey {
        DeclarationKey::new(
            self.package_ecosystem,
            &self.directory,
            self.target_branch.as_deref(),
        )
    }
}

/// Read the available-updates input file
pub fn load_batches(path: &Path) -> Result<Vec<UpdateBatch>, AppError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
    let batches = parse_batches(&content, path)?;
    tracing::debug!(path = %path.display(), batches = batches.len(), "loaded update batches");
    Ok(batches)
}

/// Parse available-updates JSON; `origin` is used in error messages
pub fn parse_batches(content: &str, origin: &Path) -> Result<Vec<UpdateBatch>, InputError> {
    serde_json::from_str(content).map_err(|e| InputError::json_parse_error(origin, e.to_string()))
}

/// Plan one declaration against its available updates
pub fn plan_declaration(
    index: usize,
    declaration: &EcosystemDeclaration,
    updates: &[DependencyUpdate],
) -> DeclarationPlan {
    let mut plan = DeclarationPlan::new(
        index,
        declaration.ecosystem,
        declaration.directory.clone(),
        declaration.target_branch.clone(),
    );

    let (ignored, candidates): (Vec<&DependencyUpdate>, Vec<&DependencyUpdate>) = updates
        .iter()
        .partition(|update| declaration.ignore.iter().any(|rule| rule.ignores(update)));

    for update in &ignored {
        tracing::debug!(dependency = %update.name, "update dropped by ignore rule");
    }
    plan.ignored = ignored.into_iter().cloned().collect();

    let (grouped, ungrouped) = partition(&declaration.groups, candidates);

    let mut proposals: Vec<UpdateProposal> = grouped
        .into_iter()
        .map(|(group, members)| proposal(declaration, Some(group), members))
        .collect();
    proposals.extend(
        ungrouped
            .into_iter()
            .map(|update| proposal(declaration, None, vec![update])),
    );

    let limit = declaration.pull_request_limit() as usize;
    if proposals.len() > limit {
        plan.deferred = proposals.split_off(limit);
        tracing::info!(
            ecosystem = %declaration.ecosystem,
            directory = %declaration.directory,
            limit,
            deferred = plan.deferred.len(),
            "open pull request limit reached"
        );
    }
    plan.proposals = proposals;

    plan
}

/// Plan every declaration of a configuration.
///
/// Batches are matched to declarations by ecosystem, directory and target
/// branch; several batches for one declaration are concatenated. A
/// declaration without a batch yields an empty plan.
pub fn plan_config(config: &UpdateConfig, batches: &[UpdateBatch]) -> PlanSummary {
    plan_config_filtered(config, batches, |_| true)
}

/// Like [`plan_config`], only planning declarations accepted by `filter`
pub fn plan_config_filtered(
    config: &UpdateConfig,
    batches: &[UpdateBatch],
    filter: impl Fn(&EcosystemDeclaration) -> bool,
) -> PlanSummary {
    let mut summary = PlanSummary::new();

    for batch in batches {
        let key = batch.key();
        if config.find(&key).is_none() {
            tracing::warn!(batch = %key, "no update entry covers this batch");
            summary.unmatched.push(key.to_string());
        }
    }

    for (index, declaration) in config.updates.iter().enumerate() {
        if !filter(declaration) {
            continue;
        }

        let key = declaration.key();
        let updates: Vec<DependencyUpdate> = batches
            .iter()
            .filter(|batch| batch.key() == key)
            .flat_map(|batch| batch.dependencies.iter().cloned())
            .collect();

        summary.add_plan(plan_declaration(index, declaration, &updates));
    }

    summary
}

fn proposal(
    declaration: &EcosystemDeclaration,
    group: Option<String>,
    members: Vec<DependencyUpdate>,
) -> UpdateProposal {
    UpdateProposal {
        ecosystem: declaration.ecosystem,
        directory: declaration.directory.clone(),
        group,
        target_branch: declaration.target_branch.clone(),
        labels: declaration.labels.iter().cloned().collect(),
        members,
    }
}
