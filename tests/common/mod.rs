//! Common test utilities for formsmith CLI tests.
//!
//! `TestEnv` gives every test its own working directory, HOME and storage
//! directory, and runs the binary inside them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a formsmith CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as a single JSON document
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}):\n{}", e, self.stdout))
    }

    /// Parse stdout as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    pub storage_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
            home_dir: tempfile::tempdir().unwrap(),
            storage_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn project_path(&self) -> &Path {
        self.project_root.path()
    }

    pub fn draft_path(&self) -> PathBuf {
        self.project_path().join(".formsmith/draft.json")
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_formsmith"))
            .current_dir(self.project_path())
            .env("HOME", self.home_dir.path())
            .env("USERPROFILE", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("FORMSMITH_STORAGE_DIR", self.storage_dir.path())
            .env_remove("FORMSMITH_STORAGE_KEY")
            .env_remove("FORMSMITH_VERBOSITY")
            .env_remove("FORMSMITH_REVALIDATE_DERIVED")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("failed to run formsmith");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Run and require success
    pub fn ok(&self, args: &[&str]) -> TestResult {
        let result = self.run(args);
        assert!(
            result.success,
            "formsmith {:?} failed:\n{}",
            args,
            result.combined_output()
        );
        result
    }

    /// Add a field and return its generated id
    pub fn add_field(&self, field_type: &str) -> String {
        self.ok(&["draft", "add", field_type]).stdout.trim().to_string()
    }
}
