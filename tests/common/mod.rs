#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sales_cleaner::{PipelineConfig, Table, io_utils};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory that cleans up after the test case.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `name` (creating parent directories) and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Config reading `input` and writing `clean.csv` inside the workspace.
    pub fn config_for(&self, input: &Path) -> PipelineConfig {
        PipelineConfig {
            input_path: input.to_path_buf(),
            output_path: self.path().join("clean.csv"),
            ..PipelineConfig::default()
        }
    }
}

/// Loads a CSV with the default missing tokens.
pub fn load(path: &Path) -> Table {
    let defaults = PipelineConfig::default();
    io_utils::read_table(path, b',', encoding_rs::UTF_8, |cell| defaults.is_na(cell))
        .expect("load table")
}
