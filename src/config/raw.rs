//! Serde model of the configuration file as written
//!
//! Values stay as strings here; [`super::parser`] turns them into typed
//! declarations and reports which entry is at fault. Keys the tool does not
//! interpret land in each level's `extra` mapping and are written back as is.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Mapping;
use std::fmt;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Top-level document. `U` is the update entry type, so the document can
/// first be read with loosely typed entries and checked one entry at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", bound(deserialize = "U: Deserialize<'de>"))]
pub struct RawConfig<U> {
    pub version: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable_beta_ecosystems: bool,
    #[serde(default)]
    pub updates: Vec<U>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One entry of `updates`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawUpdate {
    pub package_ecosystem: String,
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    pub schedule: RawSchedule,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_pull_requests_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<RawIgnore>,
    #[serde(default, skip_serializing_if = "RawGroups::is_empty")]
    pub groups: RawGroups,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSchedule {
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawGroup {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawIgnore {
    pub dependency_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// `groups` mapping in document order.
///
/// Duplicate keys are kept so validation can report them against the
/// entry instead of the YAML layer silently keeping one.
#[derive(Debug, Clone, Default)]
pub struct RawGroups(pub Vec<(String, RawGroup)>);

impl RawGroups {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RawGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, group) in &self.0 {
            map.serialize_entry(name, group)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = RawGroups;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of group names to group rules")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RawGroups::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut groups = Vec::new();
                while let Some((name, group)) = map.next_entry::<String, RawGroup>()? {
                    groups.push((name, group));
                }
                Ok(RawGroups(groups))
            }
        }

        // `any` so an explicit `groups: ~` still reaches `visit_unit` when the
        // entry was buffered for its flattened keys
        deserializer.deserialize_any(GroupsVisitor)
    }
}
