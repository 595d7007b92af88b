//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch project with an uploads directory and an output directory.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        Self { dir }
    }

    pub fn uploads(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("generated_app")
    }

    pub fn upload(&self, name: &str, bytes: &[u8]) {
        fs::create_dir_all(self.uploads()).expect("create uploads");
        fs::write(self.uploads().join(name), bytes).expect("write upload");
    }

    #[allow(dead_code)]
    pub fn read_output(&self, rel: &str) -> String {
        fs::read_to_string(self.output().join(rel)).expect("read generated file")
    }

    /// Run `ubuild build --json` against this project and parse the outcome.
    pub fn build(&self, extra: &[&str]) -> (Output, serde_json::Value) {
        let output = ubuild(self.dir.path())
            .arg("build")
            .arg("--uploads")
            .arg(self.uploads())
            .arg("--output")
            .arg(self.output())
            .arg("--json")
            .args(extra)
            .output()
            .expect("run ubuild build");
        let outcome = serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
            panic!(
                "parse build JSON ({err}): stdout={} stderr={}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            )
        });
        (output, outcome)
    }
}

pub fn ubuild(cwd: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ubuild"));
    command.current_dir(cwd).env_remove("RUST_LOG");
    command
}

pub fn strings(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|value| value.as_array())
        .unwrap_or_else(|| panic!("{key} array in {value}"))
        .iter()
        .map(|item| item.as_str().expect("string entry").to_string())
        .collect()
}
