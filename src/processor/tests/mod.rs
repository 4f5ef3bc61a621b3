//! Integration tests for the processor module
//!
//! Runs the complete pipeline on bulletins written to temporary directories.


use std::path::PathBuf;
use tempfile::TempDir;

pub const SAMPLE_BULLETIN: &str = include_str!("../../../tests/data/bulletin.txt");

/// Write `content` as a bulletin inside `temp_dir`
pub fn write_bulletin(temp_dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
