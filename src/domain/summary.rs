//! Plan result summary types
//!
//! Provides structures for tracking planned proposals at declaration and
//! overall levels.

use super::{DependencyUpdate, Ecosystem, UpdateProposal};
use serde::Serialize;

/// Planning result for a single declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeclarationPlan {
    /// Position of the declaration in `updates`
    pub index: usize,
    /// Ecosystem of the declaration
    pub ecosystem: Ecosystem,
    /// Directory of the declaration
    pub directory: String,
    /// Target branch, if pinned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Proposals to open, within the limit
    pub proposals: Vec<UpdateProposal>,
    /// Proposals held back by the open pull request limit
    pub deferred: Vec<UpdateProposal>,
    /// Updates dropped by ignore rules
    pub ignored: Vec<DependencyUpdate>,
}

impl DeclarationPlan {
    /// Creates an empty plan
    pub fn new(
        index: usize,
        ecosystem: Ecosystem,
        directory: impl Into<String>,
        target_branch: Option<String>,
    ) -> Self {
        Self {
            index,
            ecosystem,
            directory: directory.into(),
            target_branch,
            proposals: Vec::new(),
            deferred: Vec::new(),
            ignored: Vec::new(),
        }
    }

    /// Number of proposals to open
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Number of updates covered by the proposals to open
    pub fn update_count(&self) -> usize {
        self.proposals.iter().map(UpdateProposal::member_count).sum()
    }

    /// Returns true if anything will be proposed
    pub fn has_proposals(&self) -> bool {
        !self.proposals.is_empty()
    }
}

/// Overall summary of a planning run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanSummary {
    /// Plans in declaration order
    pub plans: Vec<DeclarationPlan>,
    /// Update batches that no declaration covers
    pub unmatched: Vec<String>,
}

impl PlanSummary {
    /// Creates an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration plan
    pub fn add_plan(&mut self, plan: DeclarationPlan) {
        self.plans.push(plan);
    }

    /// Total proposals to open
    pub fn total_proposals(&self) -> usize {
        self.plans.iter().map(DeclarationPlan::proposal_count).sum()
    }

    /// Total updates covered by proposals to open
    pub fn total_updates(&self) -> usize {
        self.plans.iter().map(DeclarationPlan::update_count).sum()
    }

    /// Total proposals held back by limits
    pub fn total_deferred(&self) -> usize {
        self.plans.iter().map(|p| p.deferred.len()).sum()
    }

    /// Total updates dropped by ignore rules
    pub fn total_ignored(&self) -> usize {
        self.plans.iter().map(|p| p.ignored.len()).sum()
    }
}
