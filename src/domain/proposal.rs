//! Update proposals derived from a grouping evaluation

use super::{DependencyUpdate, Ecosystem};
use serde::Serialize;

/// One change request bundling one or more dependency updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateProposal {
    /// Ecosystem of the originating declaration
    pub ecosystem: Ecosystem,
    /// Directory of the originating declaration
    pub directory: String,
    /// Group that claimed the members; `None` for a single ungrouped update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Branch the proposal targets; the repository default when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Labels stamped on the proposal
    pub labels: Vec<String>,
    /// Bundled updates, never empty
    pub members: Vec<DependencyUpdate>,
}

impl UpdateProposal {
    /// Title in the usual "Bump ..." form
    pub fn title(&self) -> String {
        let location = if self.directory == "/" {
            String::new()
        } else {
            format!(" in {}", self.directory)
        };

        match (&self.group, self.members.as_slice()) {
            (None, [single]) => format!(
                "Bump {} from {} to {}{}",
                single.name, single.current_version, single.latest_version, location
            ),
            (Some(group), [_]) => format!("Bump the {} group{} with 1 update", group, location),
            (Some(group), members) => format!(
                "Bump the {} group{} with {} updates",
                group,
                location,
                members.len()
            ),
            (None, members) => format!("Bump {} dependencies{}", members.len(), location),
        }
    }

    /// Returns true if the proposal came from a named group
    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    /// Number of bundled updates
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(
        group: Option<&str>,
        directory: &str,
        members: Vec<DependencyUpdate>,
    ) -> UpdateProposal {
        UpdateProposal {
            ecosystem: Ecosystem::Npm,
            directory: directory.to_string(),
            group: group.map(str::to_string),
            target_branch: None,
            labels: vec!["dependencies".to_string()],
            members,
        }
    }

    #[test]
    fn test_single_update_title() {
        let p = proposal(None, "/", vec![DependencyUpdate::new("react", "18.2.0", "18.3.1")]);
        assert_eq!(p.title(), "Bump react from 18.2.0 to 18.3.1");
        assert!(!p.is_grouped());
    }

    #[test]
    fn test_group_title_with_directory() {
        let p = proposal(
            Some("eslint"),
            "/ui",
            vec![
                DependencyUpdate::new("eslint", "8.0.0", "9.0.0"),
                DependencyUpdate::new("@eslint/js", "8.0.0", "9.0.0"),
            ],
        );
        assert_eq!(p.title(), "Bump the eslint group in /ui with 2 updates");
        assert!(p.is_grouped());
        assert_eq!(p.member_count(), 2);
    }

    #[test]
    fn test_group_title_single_member() {
        let p = proposal(
            Some("eslint"),
            "/",
            vec![DependencyUpdate::new("eslint", "8.0.0", "9.0.0")],
        );
        assert_eq!(p.title(), "Bump the eslint group with 1 update");
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let p = proposal(None, "/", vec![DependencyUpdate::new("a", "1.0.0", "1.0.1")]);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["ecosystem"], "npm");
        assert!(json.get("group").is_none());
        assert!(json.get("target-branch").is_none());
        assert_eq!(json["members"][0]["current-version"], "1.0.0");
    }
}
