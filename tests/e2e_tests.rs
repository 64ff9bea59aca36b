//! End-to-end tests for depgroup CLI
//!
//! These tests verify:
//! - Validation reports for valid and invalid configurations
//! - CLI produces correct JSON output schema
//! - Exit codes are correct for various scenarios
//! - `fmt --write` rewrites the configuration in canonical form

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VALID_CONFIG: &str = r#"
version: 2
updates:
  - package-ecosystem: npm
    directory: /
    schedule:
      interval: weekly
    labels: [dependencies]
    groups:
      eslint:
        patterns: ["eslint*"]
      everything-else:
        patterns: ["*"]
        exclude-patterns: ["eslint*"]
  - package-ecosystem: pip
    directory: /backend
    schedule:
      interval: daily
      time: "03:00"
"#;

const UNKNOWN_ECOSYSTEM_CONFIG: &str = r#"
version: 2
updates:
  - package-ecosystem: npm
    directory: /
    schedule: { interval: weekly }
  - package-ecosystem: not-a-real-ecosystem
    directory: /
    schedule: { interval: weekly }
"#;

const UPDATES: &str = r#"[
  {
    "package-ecosystem": "npm",
    "directory": "/",
    "dependencies": [
      { "name": "eslint", "current-version": "8.57.0", "latest-version": "9.0.0" },
      { "name": "eslint-plugin-react", "current-version": "7.33.0", "latest-version": "7.34.1" },
      { "name": "react", "current-version": "18.2.0", "latest-version": "18.3.1" }
    ]
  }
]"#;

const UNMATCHED_UPDATES: &str = r#"[
  {
    "package-ecosystem": "cargo",
    "directory": "/",
    "dependencies": [
      { "name": "serde", "current-version": "1.0.190", "latest-version": "1.0.228" }
    ]
  }
]"#;

/// Create a test directory containing a configuration file
fn create_test_project(config: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("dependabot.yml");
    fs::write(&path, config).unwrap();
    (temp_dir, path)
}

/// Command running the binary against `config` with colors off
fn depgroup_cmd(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("depgroup").expect("binary should be built");
    cmd.arg("--no-color").arg("--config").arg(config);
    cmd
}

mod validate_tests {
    use super::*;

    /// Test that a valid configuration exits successfully
    #[test]
    fn test_validate_valid_config() {
        let (_dir, config) = create_test_project(VALID_CONFIG);

        depgroup_cmd(&config)
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "configuration is valid: 2 update entries",
            ));
    }

    /// Test that an unknown ecosystem names the offending entry and fails
    #[test]
    fn test_validate_unknown_ecosystem() {
        let (_dir, config) = create_test_project(UNKNOWN_ECOSYSTEM_CONFIG);

        depgroup_cmd(&config)
            .arg("validate")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("not-a-real-ecosystem"))
            .stdout(predicate::str::contains("updates[1]"));
    }

    /// Test that a missing configuration file fails with a clear error
    #[test]
    fn test_validate_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.yml");

        depgroup_cmd(&missing)
            .arg("validate")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("file not found"));
    }

    /// Test that validation errors are reported as JSON
    #[test]
    fn test_validate_json_error() {
        let (_dir, config) = create_test_project(UNKNOWN_ECOSYSTEM_CONFIG);

        let output = depgroup_cmd(&config)
            .args(["--json", "validate"])
            .output()
            .expect("Failed to execute command");
        assert_eq!(output.status.code(), Some(1));

        let parsed: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
        assert_eq!(parsed["valid"], false);
        assert_eq!(parsed["error"]["entry"], 1);
        assert_eq!(parsed["error"]["ecosystem"], "not-a-real-ecosystem");
    }
}

mod json_output_tests {
    use super::*;

    /// Test that validate --json outputs the entry list
    #[test]
    fn test_validate_json_schema() {
        let (_dir, config) = create_test_project(VALID_CONFIG);

        let output = depgroup_cmd(&config)
            .args(["--json", "validate"])
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["valid"], true);
        assert_eq!(parsed["version"], 2);
        let entries = parsed["entries"].as_array().expect("entries should be an array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["groups"][0], "eslint");
        assert_eq!(entries[1]["directory"], "/backend");
    }

    /// Test that schedule --json resolves next runs from --now
    #[test]
    fn test_schedule_json() {
        let (_dir, config) = create_test_project(VALID_CONFIG);

        let output = depgroup_cmd(&config)
            .args(["--json", "schedule", "--now", "2026-03-10T12:00:00Z"])
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed[0]["interval"], "weekly");
        assert_eq!(parsed[0]["day"], "monday");
        assert_eq!(parsed[0]["next-run"], "2026-03-16T05:00:00+00:00");
        assert_eq!(parsed[1]["next-run"], "2026-03-11T03:00:00+00:00");
    }

    /// Test that plan --json groups the eslint family apart from the rest
    #[test]
    fn test_plan_json() {
        let (dir, config) = create_test_project(VALID_CONFIG);
        let updates = dir.path().join("updates.json");
        fs::write(&updates, UPDATES).unwrap();

        let output = depgroup_cmd(&config)
            .arg("--json")
            .arg("plan")
            .arg("--updates")
            .arg(&updates)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["summary"]["proposals"], 2);
        assert_eq!(parsed["summary"]["updates"], 3);

        let proposals = &parsed["plans"][0]["proposals"];
        assert_eq!(proposals[0]["group"], "eslint");
        assert_eq!(proposals[0]["members"].as_array().unwrap().len(), 2);
        assert_eq!(proposals[1]["group"], "everything-else");
        assert_eq!(proposals[1]["members"][0]["name"], "react");
    }
}

mod exit_code_tests {
    use super::*;

    /// Test that batches without a matching entry exit with code 2
    #[test]
    fn test_plan_unmatched_exit_code() {
        let (dir, config) = create_test_project(VALID_CONFIG);
        let updates = dir.path().join("updates.json");
        fs::write(&updates, UNMATCHED_UPDATES).unwrap();

        depgroup_cmd(&config)
            .arg("plan")
            .arg("--updates")
            .arg(&updates)
            .assert()
            .code(2)
            .stdout(predicate::str::contains("no update entry covers cargo in /"));
    }

    /// Test that a malformed updates file exits with failure
    #[test]
    fn test_plan_malformed_updates() {
        let (dir, config) = create_test_project(VALID_CONFIG);
        let updates = dir.path().join("updates.json");
        fs::write(&updates, "[{").unwrap();

        depgroup_cmd(&config)
            .arg("plan")
            .arg("--updates")
            .arg(&updates)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed to parse JSON"));
    }

    /// Test that an unknown subcommand is rejected by argument parsing
    #[test]
    fn test_unknown_subcommand() {
        Command::cargo_bin("depgroup")
            .unwrap()
            .arg("frobnicate")
            .assert()
            .failure();
    }
}

mod fmt_tests {
    use super::*;

    /// Test that fmt --write produces a file that validates identically
    #[test]
    fn test_fmt_write_round_trip() {
        let (_dir, config) = create_test_project(VALID_CONFIG);

        depgroup_cmd(&config)
            .args(["fmt", "--write"])
            .assert()
            .success();

        let rewritten = fs::read_to_string(&config).unwrap();
        assert!(rewritten.contains("package-ecosystem: npm"));
        assert!(rewritten.contains("exclude-patterns"));

        let before = depgroup_config(VALID_CONFIG);
        let after = depgroup_config(&rewritten);
        assert_eq!(before, after);
    }

    /// Test that fmt without --write leaves the file untouched
    #[test]
    fn test_fmt_prints_to_stdout() {
        let (_dir, config) = create_test_project(VALID_CONFIG);

        depgroup_cmd(&config)
            .arg("fmt")
            .assert()
            .success()
            .stdout(predicate::str::contains("version: 2"));

        assert_eq!(fs::read_to_string(&config).unwrap(), VALID_CONFIG);
    }

    /// Test that fmt --write keeps options the tool does not interpret
    #[test]
    fn test_fmt_write_keeps_unknown_keys() {
        let config_text = r#"
version: 2
registries:
  npm-internal:
    type: npm-registry
    url: https://npm.example.com
updates:
  - package-ecosystem: npm
    directory: /
    registries: [npm-internal]
    reviewers: [octocat]
    commit-message:
      prefix: deps
    schedule:
      interval: weekly
"#;
        let (_dir, config) = create_test_project(config_text);

        depgroup_cmd(&config)
            .args(["fmt", "--write"])
            .assert()
            .success();

        let rewritten = fs::read_to_string(&config).unwrap();
        for key in ["registries:", "npm-internal", "reviewers:", "octocat", "prefix: deps"] {
            assert!(rewritten.contains(key), "{} dropped from:\n{}", key, rewritten);
        }
        let original: serde_yaml::Value = serde_yaml::from_str(config_text).unwrap();
        let after: serde_yaml::Value = serde_yaml::from_str(&rewritten).unwrap();
        assert_eq!(original, after);
    }

    /// Test that fmt --write refuses to drop comments
    #[test]
    fn test_fmt_write_refuses_commented_file() {
        let commented = format!("# managed by the platform team\n{}", VALID_CONFIG);
        let (_dir, config) = create_test_project(&commented);

        depgroup_cmd(&config)
            .args(["fmt", "--write"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("contains comments"));

        assert_eq!(fs::read_to_string(&config).unwrap(), commented);
    }

    fn depgroup_config(text: &str) -> depgroup::config::UpdateConfig {
        depgroup::config::parse_config(text).expect("configuration should parse")
    }
}
