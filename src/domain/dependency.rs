//! Dependency update candidates supplied by the update runner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a dependency is needed at runtime or only for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Runtime dependency
    #[default]
    Production,
    /// Development-only dependency
    Development,
}

impl DependencyType {
    /// Returns the identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Production => "production",
            DependencyType::Development => "development",
        }
    }

    /// Parses a configuration identifier
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "production" => Some(DependencyType::Production),
            "development" => Some(DependencyType::Development),
            _ => None,
        }
    }
}

/// Semantic version change between the current and the latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
}

impl UpdateType {
    /// Plain label, as used in group `update-types`
    pub fn label(&self) -> &'static str {
        match self {
            UpdateType::Major => "major",
            UpdateType::Minor => "minor",
            UpdateType::Patch => "patch",
        }
    }

    /// Parses a group `update-types` entry
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "major" => Some(UpdateType::Major),
            "minor" => Some(UpdateType::Minor),
            "patch" => Some(UpdateType::Patch),
            _ => None,
        }
    }

    /// Key used in `ignore` rules (e.g. `version-update:semver-major`)
    pub fn ignore_key(&self) -> &'static str {
        match self {
            UpdateType::Major => "version-update:semver-major",
            UpdateType::Minor => "version-update:semver-minor",
            UpdateType::Patch => "version-update:semver-patch",
        }
    }

    /// Parses an `ignore` rule `update-types` entry
    pub fn parse_ignore_key(value: &str) -> Option<Self> {
        value
            .strip_prefix("version-update:semver-")
            .and_then(UpdateType::parse)
    }

    /// Determine the change type between two versions.
    ///
    /// Returns `None` when either version cannot be read or `new` is not
    /// newer than `old`.
    pub fn between(old: &str, new: &str) -> Option<Self> {
        let old = parse_version(old)?;
        let new = parse_version(new)?;

        if new <= old {
            return None;
        }

        if new.major != old.major {
            Some(UpdateType::Major)
        } else if new.minor != old.minor {
            Some(UpdateType::Minor)
        } else {
            Some(UpdateType::Patch)
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a version leniently: leading `v` is dropped and missing
/// minor/patch components are padded with zero.
fn parse_version(version: &str) -> Option<semver::Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    if let Ok(parsed) = semver::Version::parse(version) {
        return Some(parsed);
    }

    let core = version.split(['-', '+']).next()?;
    let mut parts = core.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    let patch = parts.next().unwrap_or(Some(0))?;

    Some(semver::Version::new(major, minor, patch))
}

/// An available update for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyUpdate {
    /// Package name
    pub name: String,
    /// Version currently in use
    pub current_version: String,
    /// Newest available version
    pub latest_version: String,
    /// Production or development dependency
    #[serde(default)]
    pub dependency_type: DependencyType,
}

impl DependencyUpdate {
    /// Creates a new production dependency update
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            latest_version: latest_version.into(),
            dependency_type: DependencyType::Production,
        }
    }

    /// Marks this update as a development dependency (builder pattern)
    pub fn development(mut self) -> Self {
        self.dependency_type = DependencyType::Development;
        self
    }

    /// Returns the semantic change type of this update, if determinable
    pub fn update_type(&self) -> Option<UpdateType> {
        UpdateType::between(&self.current_version, &self.latest_version)
    }
}

impl fmt::Display for DependencyUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = match self.dependency_type {
            DependencyType::Development => " (dev)",
            DependencyType::Production => "",
        };
        write!(
            f,
            "{} {} -> {}{}",
            self.name, self.current_version, self.latest_version, dev_marker
        )
    }
}
