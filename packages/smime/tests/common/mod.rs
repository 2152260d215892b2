//! Shared helpers for the integration tests

#![allow(dead_code)]

use cryypt_smime::{LoggingTransformer, Smime, SmimeConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Workspace for one test: fake database dir and temp-file dir
pub struct FakeTool {
    pub database: TempDir,
    pub scratch: TempDir,
}

impl FakeTool {
    pub fn new() -> Self {
        LoggingTransformer::init_test();
        Self {
            database: TempDir::new().expect("database dir"),
            scratch: TempDir::new().expect("scratch dir"),
        }
    }

    /// Configuration that runs the fake tool script through `sh`
    pub fn config(&self) -> SmimeConfig {
        SmimeConfig {
            program: PathBuf::from("sh"),
            program_args: vec![fixture_script().display().to_string()],
            database_dir: self.database.path().to_path_buf(),
            timeout_seconds: 30,
            temp_dir: Some(self.scratch.path().to_path_buf()),
        }
    }

    pub fn smime(&self) -> Smime {
        Smime::new(self.config())
    }

    /// Files currently left in the scratch dir
    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.scratch.path())
            .expect("read scratch dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }
}

pub fn fixture_script() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fake_cmsutil.sh")
}
