//! Configuration parser
//!
//! Reads the YAML document, checks every entry, and builds the typed model.
//! The first problem found rejects the whole file.

use std::collections::HashSet;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde_yaml::Mapping;

use super::raw::{RawConfig, RawGroup, RawGroups, RawIgnore, RawSchedule, RawUpdate};
use super::{EcosystemDeclaration, ExtraKeys, UpdateConfig};
use crate::domain::{DependencyType, Ecosystem, UpdateType};
use crate::error::{AppError, ConfigError, EntryRef, IoError};
use crate::grouping::{GlobPattern, GroupRule, IgnoreRule};
use crate::schedule::{parse_time, parse_weekday, weekday_name, Interval, Schedule};

/// The only format version understood
const SUPPORTED_VERSION: u32 = 2;

/// Read and validate a configuration file
pub fn load_config(path: &Path) -> Result<UpdateConfig, AppError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
    let config = parse_config(&content)?;
    tracing::debug!(
        path = %path.display(),
        entries = config.updates.len(),
        "loaded update configuration"
    );
    Ok(config)
}

/// Parse and validate configuration text
pub fn parse_config(text: &str) -> Result<UpdateConfig, ConfigError> {
    let raw = read_document(text)?;

    if raw.version != SUPPORTED_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            version: raw.version,
        });
    }

    let mut seen = HashSet::new();
    let mut updates = Vec::with_capacity(raw.updates.len());

    for (index, entry) in raw.updates.into_iter().enumerate() {
        let declaration = parse_entry(index, entry, raw.enable_beta_ecosystems)?;
        let key = declaration.key();
        if !seen.insert(key.clone()) {
            let branch = key.target_branch.as_deref().unwrap_or("the default branch");
            return Err(ConfigError::malformed(
                EntryRef::new(index, Some(declaration.ecosystem.as_str())),
                format!(
                    "another entry already covers directory '{}' on {}",
                    key.directory, branch
                ),
            ));
        }
        updates.push(declaration);
    }

    Ok(UpdateConfig {
        version: raw.version,
        enable_beta_ecosystems: raw.enable_beta_ecosystems,
        updates,
        extra: raw.extra,
    })
}

/// Serialize a configuration back to YAML
pub fn to_yaml(config: &UpdateConfig) -> Result<String, ConfigError> {
    let raw = RawConfig {
        version: config.version,
        enable_beta_ecosystems: config.enable_beta_ecosystems,
        updates: config.updates.iter().map(RawUpdate::from).collect(),
        extra: config.extra.clone(),
    };
    serde_yaml::to_string(&raw).map_err(|e| ConfigError::Serialize {
        message: e.to_string(),
    })
}

/// Returns true if `text` carries YAML comments, which a rewrite through
/// [`to_yaml`] cannot keep.
pub fn contains_comments(text: &str) -> bool {
    text.lines().any(|line| {
        let mut quote = None;
        let mut previous = ' ';
        for c in line.chars() {
            match (quote, c) {
                (None, '#') if previous.is_whitespace() => return true,
                (None, '\'' | '"') => quote = Some(c),
                (Some(open), _) if c == open => quote = None,
                _ => {}
            }
            previous = c;
        }
        false
    })
}

/// Canonical form of a directory: leading `/`, no trailing `/`, no `.`
/// segments. `"."`, `""` and `"/"` all become `"/"`.
pub fn normalize_directory(directory: &str) -> String {
    let segments: Vec<&str> = directory
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

fn read_document(text: &str) -> Result<RawConfig<RawUpdate>, ConfigError> {
    serde_yaml::from_str::<RawConfig<RawUpdate>>(text)
        .map_err(|err| locate_error(text).unwrap_or_else(|| ConfigError::yaml(err.to_string())))
}

/// Re-read the document with untyped entries to pin a deserialization
/// failure on a specific entry.
fn locate_error(text: &str) -> Option<ConfigError> {
    let loose: RawConfig<serde_yaml::Value> = serde_yaml::from_str(text).ok()?;

    loose
        .updates
        .into_iter()
        .enumerate()
        .find_map(|(index, value)| {
            let ecosystem = value
                .get("package-ecosystem")
                .and_then(serde_yaml::Value::as_str)
                .map(str::to_string);
            let err = serde_yaml::from_value::<RawUpdate>(value).err()?;
            match ecosystem {
                Some(name) if name.parse::<Ecosystem>().is_err() => {
                    Some(ConfigError::unknown_ecosystem(index, name))
                }
                ecosystem => Some(ConfigError::malformed(
                    EntryRef { index, ecosystem },
                    err.to_string(),
                )),
            }
        })
}

fn parse_entry(
    index: usize,
    entry: RawUpdate,
    enable_beta_ecosystems: bool,
) -> Result<EcosystemDeclaration, ConfigError> {
    let ecosystem: Ecosystem = entry
        .package_ecosystem
        .parse()
        .map_err(|_| ConfigError::unknown_ecosystem(index, &entry.package_ecosystem))?;
    let at = EntryRef::new(index, Some(ecosystem.as_str()));

    if ecosystem.is_beta() && !enable_beta_ecosystems {
        return Err(ConfigError::malformed(
            at,
            format!(
                "package-ecosystem '{}' is in beta; set enable-beta-ecosystems: true",
                ecosystem
            ),
        ));
    }

    check_directory(&entry.directory).map_err(|m| ConfigError::malformed(at.clone(), m))?;

    if let Some(branch) = &entry.target_branch {
        if branch.trim().is_empty() || branch.chars().any(char::is_whitespace) {
            return Err(ConfigError::malformed(
                at,
                format!("invalid target-branch '{}'", branch),
            ));
        }
    }

    let schedule =
        parse_schedule(&entry.schedule).map_err(|m| ConfigError::malformed(at.clone(), m))?;

    let mut labels = IndexSet::new();
    for label in entry.labels {
        if label.trim().is_empty() {
            return Err(ConfigError::malformed(at, "labels must not be blank"));
        }
        labels.insert(label);
    }

    let ignore = entry
        .ignore
        .iter()
        .map(|rule| parse_ignore(&at, rule))
        .collect::<Result<Vec<_>, _>>()?;

    let extra = ExtraKeys {
        entry: entry.extra,
        schedule: entry.schedule.extra,
        groups: entry
            .groups
            .0
            .iter()
            .map(|(name, group)| (name.clone(), group.extra.clone()))
            .collect(),
        ignore: entry.ignore.into_iter().map(|rule| rule.extra).collect(),
    };

    let groups = parse_groups(&at, entry.groups)?;

    Ok(EcosystemDeclaration {
        ecosystem,
        directory: entry.directory,
        target_branch: entry.target_branch,
        schedule,
        labels,
        open_pull_requests_limit: entry.open_pull_requests_limit,
        ignore,
        groups,
        extra,
    })
}

fn check_directory(directory: &str) -> Result<(), String> {
    if directory.trim().is_empty() {
        return Err("directory must not be empty".to_string());
    }
    if directory.chars().any(char::is_control) {
        return Err("directory contains a control character".to_string());
    }
    if directory.contains('*') {
        return Err(format!(
            "directory '{}' must be a literal path, not a glob",
            directory
        ));
    }
    if directory.split('/').any(|segment| segment == "..") {
        return Err(format!(
            "directory '{}' must not leave the repository",
            directory
        ));
    }
    Ok(())
}

fn parse_schedule(raw: &RawSchedule) -> Result<Schedule, String> {
    let interval = Interval::parse(&raw.interval).ok_or_else(|| {
        format!(
            "unknown schedule interval '{}': expected daily, weekly or monthly",
            raw.interval
        )
    })?;
    let mut schedule = Schedule::new(interval);

    if let Some(day) = &raw.day {
        if interval != Interval::Weekly {
            return Err(format!(
                "schedule day is only valid for weekly intervals, not {}",
                interval
            ));
        }
        let day = parse_weekday(day).ok_or_else(|| format!("unknown schedule day '{}'", day))?;
        schedule = schedule.on(day);
    }

    if let Some(time) = &raw.time {
        let time = parse_time(time)
            .ok_or_else(|| format!("invalid schedule time '{}': expected HH:MM", time))?;
        schedule = schedule.at(time);
    }

    Ok(schedule)
}

fn parse_ignore(at: &EntryRef, raw: &RawIgnore) -> Result<IgnoreRule, ConfigError> {
    let dependency_name = compile(at, &raw.dependency_name)?;
    let update_types = raw
        .update_types
        .iter()
        .map(|value| {
            UpdateType::parse_ignore_key(value).ok_or_else(|| {
                ConfigError::malformed(
                    at.clone(),
                    format!(
                        "unknown ignore update-type '{}': expected version-update:semver-major, -minor or -patch",
                        value
                    ),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IgnoreRule {
        dependency_name,
        update_types,
    })
}

fn parse_groups(
    at: &EntryRef,
    raw: RawGroups,
) -> Result<IndexMap<String, GroupRule>, ConfigError> {
    let mut groups = IndexMap::with_capacity(raw.0.len());

    for (name, group) in raw.0 {
        if name.trim().is_empty() {
            return Err(ConfigError::malformed(at.clone(), "group names must not be blank"));
        }
        if groups.contains_key(&name) {
            return Err(ConfigError::malformed(
                at.clone(),
                format!("duplicate group name '{}'", name),
            ));
        }
        let rule = parse_group(at, &name, &group)?;
        groups.insert(name, rule);
    }

    Ok(groups)
}

fn parse_group(at: &EntryRef, name: &str, raw: &RawGroup) -> Result<GroupRule, ConfigError> {
    let patterns = raw
        .patterns
        .iter()
        .map(|p| compile(at, p))
        .collect::<Result<Vec<_>, _>>()?;
    let exclude_patterns = raw
        .exclude_patterns
        .iter()
        .map(|p| compile(at, p))
        .collect::<Result<Vec<_>, _>>()?;

    let dependency_type = match &raw.dependency_type {
        Some(value) => Some(DependencyType::parse(value).ok_or_else(|| {
            ConfigError::malformed(
                at.clone(),
                format!(
                    "group '{}': unknown dependency-type '{}': expected production or development",
                    name, value
                ),
            )
        })?),
        None => None,
    };

    let update_types = raw
        .update_types
        .iter()
        .map(|value| {
            UpdateType::parse(value).ok_or_else(|| {
                ConfigError::malformed(
                    at.clone(),
                    format!(
                        "group '{}': unknown update-type '{}': expected major, minor or patch",
                        name, value
                    ),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rule = GroupRule {
        patterns,
        exclude_patterns,
        dependency_type,
        update_types,
    };

    if !rule.has_selector() {
        return Err(ConfigError::malformed(
            at.clone(),
            format!(
                "group '{}' must declare patterns, dependency-type or update-types",
                name
            ),
        ));
    }

    Ok(rule)
}

fn compile(at: &EntryRef, pattern: &str) -> Result<GlobPattern, ConfigError> {
    GlobPattern::new(pattern)
        .map_err(|e| ConfigError::invalid_glob(at.clone(), pattern, e.to_string()))
}

impl From<&EcosystemDeclaration> for RawUpdate {
    fn from(declaration: &EcosystemDeclaration) -> Self {
        let schedule = &declaration.schedule;
        let extra = &declaration.extra;
        RawUpdate {
            package_ecosystem: declaration.ecosystem.as_str().to_string(),
            directory: declaration.directory.clone(),
            target_branch: declaration.target_branch.clone(),
            schedule: RawSchedule {
                interval: schedule.interval.as_str().to_string(),
                day: schedule.day.map(|day| weekday_name(day).to_string()),
                time: schedule.time.map(|time| time.format("%H:%M").to_string()),
                extra: extra.schedule.clone(),
            },
            labels: declaration.labels.iter().cloned().collect(),
            open_pull_requests_limit: declaration.open_pull_requests_limit,
            ignore: declaration
                .ignore
                .iter()
                .enumerate()
                .map(|(position, rule)| RawIgnore {
                    dependency_name: rule.dependency_name.as_str().to_string(),
                    update_types: rule
                        .update_types
                        .iter()
                        .map(|t| t.ignore_key().to_string())
                        .collect(),
                    extra: extra.ignore.get(position).cloned().unwrap_or_default(),
                })
                .collect(),
            groups: RawGroups(
                declaration
                    .groups
                    .iter()
                    .map(|(name, rule)| {
                        let mut group = RawGroup::from(rule);
                        group.extra = extra.groups.get(name).cloned().unwrap_or_default();
                        (name.clone(), group)
                    })
                    .collect(),
            ),
            extra: extra.entry.clone(),
        }
    }
}

impl From<&GroupRule> for RawGroup {
    fn from(rule: &GroupRule) -> Self {
        RawGroup {
            patterns: pattern_sources(&rule.patterns),
            exclude_patterns: pattern_sources(&rule.exclude_patterns),
            dependency_type: rule.dependency_type.map(|t| t.as_str().to_string()),
            update_types: rule
                .update_types
                .iter()
                .map(|t| t.label().to_string())
                .collect(),
            extra: Mapping::new(),
        }
    }
}

fn pattern_sources(patterns: &[GlobPattern]) -> Vec<String> {
    patterns.iter().map(|p| p.as_str().to_string()).collect()
}
