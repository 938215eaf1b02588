//! Configuration file parsing and discovery

use crate::config::schema::validate_document;
use crate::config::types::{Document, RawDocument};
use crate::error::{LoadError, LoadResult};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the root config location
pub const ROOT_CONFIG_ENV: &str = "DOMESTOBOT_ROOT_CONFIG";

/// File name of the root config inside the user config directory
const ROOT_CONFIG_FILE_NAME: &str = "root.toml";

/// Document formats understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    /// Pick the format from the file extension, TOML unless it says YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Format::Yaml,
            _ => Format::Toml,
        }
    }
}

/// Find the root configuration file
///
/// An explicit path wins, then `DOMESTOBOT_ROOT_CONFIG`, then
/// `<config dir>/domestobot/root.toml`.
pub fn root_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    match env::var_os(ROOT_CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_config_dir().join(ROOT_CONFIG_FILE_NAME),
    }
}

fn default_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "domestobot")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".config").join("domestobot"))
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> LoadResult<Document> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Parse {
            path: path.to_path_buf(),
            error: format!("failed to read file: {}", e),
        },
    })?;

    parse_config(&contents, Format::from_path(path), path)
}

/// Parse configuration from a string
///
/// `path` is only used to locate errors.
pub fn parse_config(text: &str, format: Format, path: &Path) -> LoadResult<Document> {
    let raw = match format {
        Format::Toml => parse_toml(text, path)?,
        Format::Yaml => parse_yaml(text, path)?,
    };

    validate_document(raw, path)
}

fn parse_toml(text: &str, path: &Path) -> LoadResult<RawDocument> {
    let value: toml::Table = toml::from_str(text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        error: e.message().to_string(),
    })?;

    toml::Value::Table(value).try_into().map_err(|e: toml::de::Error| LoadError::Schema {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

fn parse_yaml(text: &str, path: &Path) -> LoadResult<RawDocument> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    // An empty YAML file is an empty document
    if value.is_null() {
        return Ok(RawDocument::default());
    }

    serde_yaml::from_value(value).map_err(|e| LoadError::Schema {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
