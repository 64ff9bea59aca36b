//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Issues with the update configuration file
//! - InputError: Issues with the available-updates input
//! - IoError: File system operation failures

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Available-updates input related errors
    #[error(transparent)]
    Input(#[from] InputError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Identifies one entry of the `updates` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// Zero-based position in the `updates` list
    pub index: usize,
    /// The `package-ecosystem` value as written, if present
    pub ecosystem: Option<String>,
}

impl EntryRef {
    /// Creates a new entry reference
    pub fn new(index: usize, ecosystem: Option<&str>) -> Self {
        Self {
            index,
            ecosystem: ecosystem.map(str::to_string),
        }
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ecosystem {
            Some(ecosystem) => write!(f, "updates[{}] ({})", self.index, ecosystem),
            None => write!(f, "updates[{}]", self.index),
        }
    }
}

/// Errors related to the update configuration file.
///
/// All of these are detected while loading; a configuration that fails
/// any check is rejected as a whole.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid YAML or has the wrong top-level shape
    #[error("failed to parse configuration: {message}")]
    Yaml { message: String },

    /// Only version 2 of the format is understood
    #[error("unsupported configuration version {version}: expected 2")]
    UnsupportedVersion { version: u32 },

    /// Schema violation inside one update entry
    #[error("malformed configuration at {entry}: {message}")]
    MalformedConfig { entry: EntryRef, message: String },

    /// Unrecognized package-ecosystem identifier
    #[error("unknown package-ecosystem '{value}' at {entry}")]
    UnknownEcosystem { entry: EntryRef, value: String },

    /// A group or ignore pattern could not be compiled
    #[error("invalid glob pattern '{pattern}' at {entry}: {message}")]
    InvalidGlobPattern {
        entry: EntryRef,
        pattern: String,
        message: String,
    },

    /// The configuration could not be written back out
    #[error("failed to serialize configuration: {message}")]
    Serialize { message: String },
}

/// Errors related to the available-updates input file
#[derive(Error, Debug)]
pub enum InputError {
    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new Yaml error
    pub fn yaml(message: impl Into<String>) -> Self {
        ConfigError::Yaml {
            message: message.into(),
        }
    }

    /// Creates a new MalformedConfig error
    pub fn malformed(entry: EntryRef, message: impl Into<String>) -> Self {
        ConfigError::MalformedConfig {
            entry,
            message: message.into(),
        }
    }

    /// Creates a new UnknownEcosystem error
    pub fn unknown_ecosystem(index: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        ConfigError::UnknownEcosystem {
            entry: EntryRef::new(index, Some(&value)),
            value,
        }
    }

    /// Creates a new InvalidGlobPattern error
    pub fn invalid_glob(
        entry: EntryRef,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidGlobPattern {
            entry,
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Returns the offending entry, if the error is tied to one
    pub fn entry(&self) -> Option<&EntryRef> {
        match self {
            ConfigError::MalformedConfig { entry, .. }
            | ConfigError::UnknownEcosystem { entry, .. }
            | ConfigError::InvalidGlobPattern { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

impl InputError {
    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        InputError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        IoError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError, mapping a missing file to NotFound
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return IoError::not_found(path);
        }
        IoError::ReadError { path, source }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::WriteError {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_ref_display() {
        assert_eq!(
            EntryRef::new(2, Some("npm")).to_string(),
            "updates[2] (npm)"
        );
        assert_eq!(EntryRef::new(0, None).to_string(), "updates[0]");
    }

    #[test]
    fn test_unknown_ecosystem_names_entry() {
        let err = ConfigError::unknown_ecosystem(1, "not-a-real-ecosystem");
        let msg = format!("{}", err);
        assert!(msg.contains("unknown package-ecosystem 'not-a-real-ecosystem'"));
        assert!(msg.contains("updates[1]"));
        assert_eq!(err.entry().map(|e| e.index), Some(1));
    }

    #[test]
    fn test_malformed_config() {
        let err = ConfigError::malformed(EntryRef::new(0, Some("pip")), "missing schedule");
        let msg = format!("{}", err);
        assert!(msg.contains("malformed configuration at updates[0] (pip)"));
        assert!(msg.contains("missing schedule"));
    }

    #[test]
    fn test_invalid_glob() {
        let err = ConfigError::invalid_glob(EntryRef::new(3, Some("npm")), "", "pattern is empty");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid glob pattern ''"));
        assert!(msg.contains("updates[3] (npm)"));
    }

    #[test]
    fn test_yaml_error_has_no_entry() {
        let err = ConfigError::yaml("did not find expected key");
        assert!(err.entry().is_none());
        assert!(format!("{}", err).contains("failed to parse configuration"));
    }

    #[test]
    fn test_unsupported_version() {
        let err = ConfigError::UnsupportedVersion { version: 1 };
        assert!(format!("{}", err).contains("unsupported configuration version 1"));
    }

    #[test]
    fn test_io_read_error_not_found() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IoError::read_error("/missing/dependabot.yml", source);
        assert!(matches!(err, IoError::NotFound { .. }));
        assert!(format!("{}", err).contains("file not found"));
    }

    #[test]
    fn test_io_read_error_other() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = IoError::read_error("/protected", source);
        assert!(matches!(err, IoError::ReadError { .. }));
    }

    #[test]
    fn test_input_error() {
        let err = InputError::json_parse_error("updates.json", "expected value");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON in updates.json"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::unknown_ecosystem(0, "foo").into();
        assert!(format!("{}", app_err).contains("unknown package-ecosystem"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let app_err: AppError = IoError::not_found("/missing").into();
        assert!(format!("{}", app_err).contains("file not found"));
    }
}
