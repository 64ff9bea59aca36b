//! Grouping engine
//!
//! This module provides:
//! - Glob patterns over dependency names
//! - Group rules (include/exclude patterns plus type selectors)
//! - Ignore rules applied before grouping
//! - First-match group assignment in declaration order

mod pattern;
mod rule;

pub use pattern::{GlobPattern, PatternError};
pub use rule::{GroupRule, IgnoreRule};

use crate::domain::DependencyUpdate;
use indexmap::IndexMap;

/// Returns the name of the first group, in declaration order, that
/// accepts the update. `None` means the update stands alone.
pub fn assign_group<'a>(
    groups: &'a IndexMap<String, GroupRule>,
    update: &DependencyUpdate,
) -> Option<&'a str> {
    groups
        .iter()
        .find(|(_, rule)| rule.accepts(update))
        .map(|(name, _)| name.as_str())
}

/// Splits updates into per-group buckets (declaration order, empty groups
/// omitted) and the updates no group claimed (input order).
pub fn partition<'u>(
    groups: &IndexMap<String, GroupRule>,
    updates: impl IntoIterator<Item = &'u DependencyUpdate>,
) -> (IndexMap<String, Vec<DependencyUpdate>>, Vec<DependencyUpdate>) {
    let mut grouped: IndexMap<String, Vec<DependencyUpdate>> = groups
        .keys()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let mut ungrouped = Vec::new();

    for update in updates {
        match assign_group(groups, update) {
            Some(name) => {
                tracing::debug!(dependency = %update.name, group = name, "grouped update");
                if let Some(members) = grouped.get_mut(name) {
                    members.push(update.clone());
                }
            }
            None => {
                tracing::debug!(dependency = %update.name, "update not claimed by any group");
                ungrouped.push(update.clone());
            }
        }
    }

    grouped.retain(|_, members| !members.is_empty());
    (grouped, ungrouped)
}
