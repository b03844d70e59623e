#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dataset_quality::{
    config::{LoadOptions, ProfileConfig},
    dataset::Table,
    loader,
    report::{self, QualityReport},
};
use tempfile::{TempDir, tempdir};

/// Absolute path to a CSV fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn load_fixture(name: &str) -> Table {
    loader::load_table(&fixture_path(name), &LoadOptions::default()).expect("load fixture")
}

pub fn fixture_report(name: &str, config: &ProfileConfig) -> QualityReport {
    report::generate_report(&fixture_path(name), config)
}

/// Scratch directory for datasets written by a single test.
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

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write dataset");
        path
    }
}
