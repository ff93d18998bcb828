//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Contents of `tests/fixtures/<name>`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(Path::new("tests").join("fixtures").join(name)).unwrap()
}

/// Copy `tests/fixtures/<name>` into `temp_dir` and return the copy's path.
#[allow(dead_code)]
pub fn copy_fixture(temp_dir: &TempDir, name: &str) -> PathBuf {
    let target = temp_dir.path().join(name);
    std::fs::copy(Path::new("tests").join("fixtures").join(name), &target).unwrap();
    target
}
