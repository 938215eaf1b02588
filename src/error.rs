//! Error types for Domestobot

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Domestobot operations
pub type Result<T> = std::result::Result<T, DomestobotError>;

/// Main error type for Domestobot
#[derive(Error, Debug)]
pub enum DomestobotError {
    /// Errors found while loading the configuration tree
    #[error("{0}")]
    Load(#[from] LoadError),

    /// Step execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// A name the invocation tree does not know
    #[error("'{0}' is not a valid step")]
    UnknownStep(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DomestobotError {
    /// Process exit status to report for this error.
    ///
    /// A command that exited with a code passes that code through; every
    /// other failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DomestobotError::Execution(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Errors raised while reading and assembling configuration documents
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Error while parsing config file '{}': {error}", .path.display())]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config file '{}': {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("Invalid step in '{}': {source}", .path.display())]
    Step {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Cyclic sub_domestobots reference: {0}")]
    CyclicReference(String),
}

/// Step definitions that do not have exactly one execution form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "{location}: exactly 1 of `command`, `commands`, `shell_command`, `shell_commands`{} must be specified and non-empty, found {}",
        or_envs(.allows_envs),
        .found.join(", ")
    )]
    AmbiguousForm {
        location: String,
        found: Vec<&'static str>,
        allows_envs: bool,
    },

    #[error(
        "{location}: exactly 1 of `command`, `commands`, `shell_command`, `shell_commands`{} must be specified and non-empty",
        or_envs(.allows_envs)
    )]
    MissingForm { location: String, allows_envs: bool },

    #[error("{location}: command {index} has no program to run")]
    EmptyCommand { location: String, index: usize },
}

/// Step execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command {index} (`{command}`) could not be started: {source}")]
    SpawnFailure {
        index: usize,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command {index} (`{command}`) failed with exit code {}", display_code(.code))]
    NonZeroExit {
        index: usize,
        command: String,
        code: Option<i32>,
    },

    #[error("Step '{step}' failed: {source}")]
    InStep {
        step: String,
        #[source]
        source: Box<ExecutionError>,
    },
}

impl ExecutionError {
    /// Index of the failed command within its step's command list
    pub fn command_index(&self) -> usize {
        match self {
            ExecutionError::SpawnFailure { index, .. } | ExecutionError::NonZeroExit { index, .. } => {
                *index
            }
            ExecutionError::InStep { source, .. } => source.command_index(),
        }
    }

    /// Name of the innermost step that failed, if known
    pub fn step(&self) -> Option<&str> {
        match self {
            ExecutionError::InStep { step, source } => source.step().or(Some(step.as_str())),
            _ => None,
        }
    }

    /// Process exit status that mirrors this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::NonZeroExit { code: Some(code), .. } if *code != 0 => *code,
            ExecutionError::InStep { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

fn or_envs(allows_envs: &bool) -> &'static str {
    if *allows_envs {
        " or `envs`"
    } else {
        ""
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Specialized result type for loading operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Specialized result type for step validation
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
