//! Common test utilities

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with a root.toml file
pub fn create_root_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "root.toml", content);
    (temp_dir, config_path)
}

/// Write a config file next to the others
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// The binary with a fixed platform, no log file and no colors
pub fn domestobot() -> Command {
    let mut cmd = Command::cargo_bin("domestobot").unwrap();
    cmd.env("DOMESTOBOT_LOG", "")
        .env("DOMESTOBOT_PLATFORM", "Linux")
        .env("NO_COLOR", "1")
        .env_remove("DOMESTOBOT_ROOT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
