//! Glob patterns over dependency names
//!
//! Only `*` is special; it matches any run of characters, including none.
//! Matching is case-sensitive and anchored to the full name.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Reasons a pattern is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Blank pattern
    #[error("pattern is empty")]
    Empty,

    /// Control characters never appear in package names
    #[error("pattern contains a control character")]
    ControlCharacter,

    /// Regex compilation failed
    #[error("{0}")]
    Compile(String),
}

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        if pattern.chars().any(char::is_control) {
            return Err(PatternError::ControlCharacter);
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{}$", body))
            .map_err(|e| PatternError::Compile(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if the whole name matches
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for GlobPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}
