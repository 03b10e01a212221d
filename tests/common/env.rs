//! Test environment for running the locsync binary.
//!
//! Provides `TestEnv` - a temp directory holding workbooks, the tree store
//! and an isolated config/data home.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use locsync::application::Workbook;
use locsync::infrastructure::TomlTreeStore;

/// Result of running a locsync CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Every stdout line parsed as JSON (for `--json` runs)
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("not JSON: {line:?} ({e})"))
            })
            .collect()
    }
}

pub struct TestEnv {
    pub root: TempDir,
    locsync_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("Failed to create temp dir"),
            locsync_bin: PathBuf::from(env!("CARGO_BIN_EXE_locsync")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn store_path(&self) -> PathBuf {
        self.path("store/tree.toml")
    }

    /// Write a workbook as JSON and return its path
    pub fn write_workbook(&self, name: &str, workbook: &Workbook) -> PathBuf {
        let json = serde_json::to_string_pretty(workbook).expect("Failed to serialize workbook");
        self.write_file(name, &json)
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn open_store(&self) -> TomlTreeStore {
        TomlTreeStore::open(self.store_path()).expect("Failed to open store")
    }

    /// Run locsync against this environment's store
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.locsync_bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("LOCSYNC_STORE", self.store_path())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("XDG_DATA_HOME", self.path("data"))
            .env("HOME", self.root.path())
            .env_remove("LOCSYNC_TENANT")
            .env_remove("RUST_LOG");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute locsync");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
