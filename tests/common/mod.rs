//! Shared test infrastructure for integration tests.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// 2025-01-01T00:00:00Z, pins the header date.
pub const SOURCE_DATE_EPOCH: &str = "1735689600";

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

pub fn fixture_actionsmap() -> PathBuf {
    manifest_dir().join("tests/fixtures/actionsmap.yml")
}

/// Scratch working directory with the generator pointed at an actions map.
pub struct TestFixture {
    pub work_dir: TempDir,
    pub actionsmap: PathBuf,
}

impl TestFixture {
    pub fn from_fixture() -> Self {
        Self::with_actionsmap(fixture_actionsmap())
    }

    pub fn with_actionsmap(actionsmap: PathBuf) -> Self {
        Self {
            work_dir: TempDir::new().expect("create work dir"),
            actionsmap,
        }
    }

    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Run the generator inside the work dir with the given flags.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_actionsmap-man"))
            .args(args)
            .current_dir(self.path())
            .env("YUNOHOST_ACTIONSMAP", &self.actionsmap)
            .env("SOURCE_DATE_EPOCH", SOURCE_DATE_EPOCH)
            .env_remove("RUST_LOG")
            .output()
            .expect("spawn actionsmap-man")
    }

    /// Run and assert success, returning stderr for diagnostics.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        assert!(
            output.status.success(),
            "actionsmap-man {args:?} failed: {stderr}"
        );
        stderr
    }
}
