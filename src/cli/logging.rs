//! Logging setup
//!
//! Logs go to a file so they never mix with step output. `DOMESTOBOT_LOG`
//! names the file; an empty value sends logs to stderr instead.

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming the log file
pub const LOG_ENV: &str = "DOMESTOBOT_LOG";

/// Where log records should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Pick the log target from the environment
pub fn log_target() -> LogTarget {
    match env::var_os(LOG_ENV) {
        Some(path) if path.is_empty() => LogTarget::Stderr,
        Some(path) => LogTarget::File(PathBuf::from(path)),
        None => match default_log_path() {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Stderr,
        },
    }
}

fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "domestobot").map(|dirs| dirs.cache_dir().join("log"))
}

/// Install the global logger
///
/// Falls back to stderr when the log file cannot be opened. Calling this
/// more than once is harmless.
pub fn init() {
    let (file, fallback) = match log_target() {
        LogTarget::File(path) => match open_log_file(&path) {
            Ok(file) => (Some(file), None),
            Err(e) => (
                None,
                Some(format!("cannot open log file {}: {}", path.display(), e)),
            ),
        },
        LogTarget::Stderr => (None, None),
    };

    let mut builder = match file {
        Some(file) => {
            let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };

    if builder.try_init().is_ok() {
        if let Some(message) = fallback {
            log::warn!("{}, logging to stderr", message);
        }
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
