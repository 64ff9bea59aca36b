//! Group and ignore rules

use super::pattern::{GlobPattern, PatternError};
use crate::domain::{DependencyType, DependencyUpdate, UpdateType};

/// Selects which dependency updates are bundled into one named group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupRule {
    /// Include patterns; a name must match at least one
    pub patterns: Vec<GlobPattern>,
    /// Exclude patterns; a name must match none
    pub exclude_patterns: Vec<GlobPattern>,
    /// Restrict to production or development dependencies
    pub dependency_type: Option<DependencyType>,
    /// Restrict to these semantic change types
    pub update_types: Vec<UpdateType>,
}

impl GroupRule {
    /// Build a rule from include and exclude patterns
    pub fn from_patterns(include: &[&str], exclude: &[&str]) -> Result<Self, PatternError> {
        Ok(Self {
            patterns: compile_all(include)?,
            exclude_patterns: compile_all(exclude)?,
            dependency_type: None,
            update_types: Vec::new(),
        })
    }

    /// Restrict to a dependency type (builder pattern)
    pub fn with_dependency_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_type = Some(dependency_type);
        self
    }

    /// Restrict to update types (builder pattern)
    pub fn with_update_types(mut self, update_types: Vec<UpdateType>) -> Self {
        self.update_types = update_types;
        self
    }

    /// Returns true if the rule selects by something other than name
    pub fn has_non_name_selector(&self) -> bool {
        self.dependency_type.is_some() || !self.update_types.is_empty()
    }

    /// Returns true if the rule selects anything at all
    pub fn has_selector(&self) -> bool {
        !self.patterns.is_empty() || self.has_non_name_selector()
    }

    /// Name check: at least one include pattern and no exclude pattern.
    ///
    /// A rule without include patterns but with another selector
    /// accepts every name.
    pub fn matches(&self, name: &str) -> bool {
        let included = if self.patterns.is_empty() {
            self.has_non_name_selector()
        } else {
            self.patterns.iter().any(|p| p.matches(name))
        };

        included && !self.exclude_patterns.iter().any(|p| p.matches(name))
    }

    /// Full check of an update against every selector of the rule
    pub fn accepts(&self, update: &DependencyUpdate) -> bool {
        if !self.matches(&update.name) {
            return false;
        }

        if let Some(dependency_type) = self.dependency_type {
            if update.dependency_type != dependency_type {
                return false;
            }
        }

        if self.update_types.is_empty() {
            return true;
        }

        update
            .update_type()
            .is_some_and(|t| self.update_types.contains(&t))
    }
}

/// Drops updates before grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    /// Dependency name pattern
    pub dependency_name: GlobPattern,
    /// Only ignore these change types; empty ignores every update
    pub update_types: Vec<UpdateType>,
}

impl IgnoreRule {
    /// Ignore every update of matching dependencies
    pub fn new(dependency_name: &str) -> Result<Self, PatternError> {
        Ok(Self {
            dependency_name: GlobPattern::new(dependency_name)?,
            update_types: Vec::new(),
        })
    }

    /// Only ignore these change types (builder pattern)
    pub fn with_update_types(mut self, update_types: Vec<UpdateType>) -> Self {
        self.update_types = update_types;
        self
    }

    /// Returns true if the update should be dropped
    pub fn ignores(&self, update: &DependencyUpdate) -> bool {
        if !self.dependency_name.matches(&update.name) {
            return false;
        }
        if self.update_types.is_empty() {
            return true;
        }
        update
            .update_type()
            .is_some_and(|t| self.update_types.contains(&t))
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<GlobPattern>, PatternError> {
    patterns.iter().map(|p| GlobPattern::new(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESLINT: [&str; 3] = ["eslint*", "@eslint*", "typescript-eslint"];

    fn eslint_group() -> GroupRule {
        GroupRule::from_patterns(&ESLINT, &[]).unwrap()
    }

    fn remainder_group() -> GroupRule {
        GroupRule::from_patterns(&["*"], &ESLINT).unwrap()
    }

    #[test]
    fn test_carve_out_group() {
        let group = eslint_group();
        assert!(group.matches("eslint-plugin-react"));
        assert!(group.matches("@eslint/js"));
        assert!(group.matches("typescript-eslint"));
        assert!(!group.matches("requests"));
    }

    #[test]
    fn test_remainder_group_excludes_carve_out() {
        let group = remainder_group();
        assert!(!group.matches("eslint-plugin-react"));
        assert!(!group.matches("typescript-eslint"));
        assert!(group.matches("requests"));
        assert!(group.matches("react"));
    }

    #[test]
    fn test_catch_all_and_carve_out_are_complementary() {
        let carve_out = eslint_group();
        let remainder = remainder_group();
        for name in [
            "eslint",
            "eslint-config-prettier",
            "@eslint/eslintrc",
            "typescript-eslint",
            "typescript",
            "requests",
            "@types/node",
            "",
        ] {
            assert!(
                carve_out.matches(name) ^ remainder.matches(name),
                "{name} must land in exactly one group"
            );
        }
    }

    #[test]
    fn test_matches_is_deterministic() {
        let group = remainder_group();
        let first = group.matches("vite");
        for _ in 0..10 {
            assert_eq!(group.matches("vite"), first);
        }
    }

    #[test]
    fn test_no_patterns_without_selector_matches_nothing() {
        let group = GroupRule::default();
        assert!(!group.has_selector());
        assert!(!group.matches("anything"));
    }

    #[test]
    fn test_dependency_type_only_group() {
        let group = GroupRule::default().with_dependency_type(DependencyType::Development);
        assert!(group.has_selector());
        assert!(group.matches("jest"));

        let dev = DependencyUpdate::new("jest", "29.0.0", "29.1.0").development();
        let prod = DependencyUpdate::new("react", "18.0.0", "18.1.0");
        assert!(group.accepts(&dev));
        assert!(!group.accepts(&prod));
    }

    #[test]
    fn test_update_types_group() {
        let group = GroupRule::from_patterns(&["*"], &[])
            .unwrap()
            .with_update_types(vec![UpdateType::Minor, UpdateType::Patch]);

        assert!(group.accepts(&DependencyUpdate::new("a", "1.0.0", "1.0.1")));
        assert!(group.accepts(&DependencyUpdate::new("b", "1.0.0", "1.2.0")));
        assert!(!group.accepts(&DependencyUpdate::new("c", "1.0.0", "2.0.0")));
        assert!(!group.accepts(&DependencyUpdate::new("d", "main", "develop")));
    }

    #[test]
    fn test_ignore_rule_all_updates() {
        let rule = IgnoreRule::new("aws-sdk*").unwrap();
        assert!(rule.ignores(&DependencyUpdate::new("aws-sdk-s3", "1.0.0", "1.0.1")));
        assert!(!rule.ignores(&DependencyUpdate::new("boto3", "1.0.0", "1.0.1")));
    }

    #[test]
    fn test_ignore_rule_major_only() {
        let rule = IgnoreRule::new("django")
            .unwrap()
            .with_update_types(vec![UpdateType::Major]);
        assert!(rule.ignores(&DependencyUpdate::new("django", "4.2.0", "5.0.0")));
        assert!(!rule.ignores(&DependencyUpdate::new("django", "4.2.0", "4.2.1")));
    }
}
