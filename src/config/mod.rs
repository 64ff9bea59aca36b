//! Dependency-update configuration
//!
//! This module provides:
//! - The typed configuration model (`UpdateConfig`, `EcosystemDeclaration`)
//! - Loading and validating configuration files
//! - Writing a configuration back out as YAML

mod parser;
mod raw;

pub use parser::{contains_comments, load_config, normalize_directory, parse_config, to_yaml};

use crate::domain::Ecosystem;
use crate::grouping::{GroupRule, IgnoreRule};
use crate::schedule::Schedule;
use indexmap::{IndexMap, IndexSet};
use serde_yaml::Mapping;
use std::fmt;

/// Default location of the configuration file, relative to the repository root
pub const DEFAULT_CONFIG_PATH: &str = ".github/dependabot.yml";

/// Proposals opened per declaration when no limit is configured
pub const DEFAULT_OPEN_PULL_REQUESTS_LIMIT: u32 = 5;

/// A validated configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Format version (always 2)
    pub version: u32,
    /// Whether beta ecosystems may be declared
    pub enable_beta_ecosystems: bool,
    /// Update declarations in file order
    pub updates: Vec<EcosystemDeclaration>,
    /// Top-level keys carried through unchanged (`registries`, ...)
    pub extra: Mapping,
}

impl UpdateConfig {
    /// Finds the declaration for an ecosystem/directory/branch combination
    pub fn find(&self, key: &DeclarationKey) -> Option<(usize, &EcosystemDeclaration)> {
        self.updates
            .iter()
            .enumerate()
            .find(|(_, declaration)| declaration.key() == *key)
    }
}

/// One entry of `updates`: an ecosystem, where to look, and how to propose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcosystemDeclaration {
    /// Package ecosystem
    pub ecosystem: Ecosystem,
    /// Directory to scan, as written
    pub directory: String,
    /// Branch proposals target; the repository default when `None`
    pub target_branch: Option<String>,
    /// How often to check
    pub schedule: Schedule,
    /// Labels stamped on every proposal
    pub labels: IndexSet<String>,
    /// Cap on proposals per run
    pub open_pull_requests_limit: Option<u32>,
    /// Updates dropped before grouping
    pub ignore: Vec<IgnoreRule>,
    /// Named groups in declaration order
    pub groups: IndexMap<String, GroupRule>,
    /// Keys this tool does not interpret, written back unchanged
    pub extra: ExtraKeys,
}

/// Uninterpreted keys found inside one `updates` entry.
///
/// Group and ignore keys are tracked by group name and ignore position so
/// they follow the typed rules they were written next to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraKeys {
    /// Entry-level keys such as `reviewers` or `commit-message`
    pub entry: Mapping,
    /// Keys inside `schedule` such as `timezone`
    pub schedule: Mapping,
    /// Keys inside each group, by group name
    pub groups: IndexMap<String, Mapping>,
    /// Keys inside each ignore rule, aligned with `ignore`
    pub ignore: Vec<Mapping>,
}

impl ExtraKeys {
    /// Returns true if nothing was carried through
    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
            && self.schedule.is_empty()
            && self.groups.values().all(Mapping::is_empty)
            && self.ignore.iter().all(Mapping::is_empty)
    }
}

impl EcosystemDeclaration {
    /// Creates a declaration with no labels, groups or ignore rules
    pub fn new(ecosystem: Ecosystem, directory: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            ecosystem,
            directory: directory.into(),
            target_branch: None,
            schedule,
            labels: IndexSet::new(),
            open_pull_requests_limit: None,
            ignore: Vec::new(),
            groups: IndexMap::new(),
            extra: ExtraKeys::default(),
        }
    }

    /// Sets the target branch (builder pattern)
    pub fn with_target_branch(mut self, branch: impl Into<String>) -> Self {
        self.target_branch = Some(branch.into());
        self
    }

    /// Adds a label (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Appends a group (builder pattern)
    pub fn with_group(mut self, name: impl Into<String>, rule: GroupRule) -> Self {
        self.groups.insert(name.into(), rule);
        self
    }

    /// Appends an ignore rule (builder pattern)
    pub fn with_ignore(mut self, rule: IgnoreRule) -> Self {
        self.ignore.push(rule);
        self
    }

    /// Sets the proposal limit (builder pattern)
    pub fn with_open_pull_requests_limit(mut self, limit: u32) -> Self {
        self.open_pull_requests_limit = Some(limit);
        self
    }

    /// Effective proposal limit
    pub fn pull_request_limit(&self) -> u32 {
        self.open_pull_requests_limit
            .unwrap_or(DEFAULT_OPEN_PULL_REQUESTS_LIMIT)
    }

    /// Identity of this declaration within a configuration
    pub fn key(&self) -> DeclarationKey {
        DeclarationKey::new(self.ecosystem, &self.directory, self.target_branch.as_deref())
    }
}

/// Ecosystem, normalized directory and target branch.
///
/// No two declarations in one configuration share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationKey {
    pub ecosystem: Ecosystem,
    pub directory: String,
    pub target_branch: Option<String>,
}

impl DeclarationKey {
    /// Creates a key, normalizing the directory
    pub fn new(ecosystem: Ecosystem, directory: &str, target_branch: Option<&str>) -> Self {
        Self {
            ecosystem,
            directory: normalize_directory(directory),
            target_branch: target_branch.map(str::to_string),
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.ecosystem, self.directory)?;
        if let Some(branch) = &self.target_branch {
            write!(f, " on {}", branch)?;
        }
        Ok(())
    }
}
