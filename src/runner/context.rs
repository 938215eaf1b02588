//! Execution context for step running
//!
//! The context carries the settings that apply to a whole invocation and the
//! helpers used to print progress.

use crate::runner::command::{CommandRunner, DryRunner, SystemRunner};
use colored::Colorize;

/// Execution context shared by every step of one invocation
#[derive(Debug, Clone)]
pub struct Context {
    /// Interpreter for shell-form commands (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Whether commands are run or only printed
    pub mode: RunMode,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// How commands are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Spawn real processes
    Default,

    /// Print each command instead of running it
    DryRun,
}

/// Interpreter used when the root config does not set one
pub fn default_interpreter() -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec!["cmd".to_string(), "/C".to_string()]
    } else {
        vec!["sh".to_string(), "-c".to_string()]
    }
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            interpreter: default_interpreter(),
            verbosity: Verbosity::Normal,
            mode: RunMode::Default,
        }
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the run mode
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runner matching the run mode
    pub fn runner(&self) -> Box<dyn CommandRunner> {
        match self.mode {
            RunMode::Default => Box::new(SystemRunner::new(self.interpreter.clone())),
            RunMode::DryRun => Box::new(DryRunner),
        }
    }

    /// Print a step title
    pub fn print_title(&self, title: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("{}", format!("\n{}...", title).magenta().bold());
        }
    }

    /// Print a command right before it runs (only in verbose mode)
    pub fn print_command(&self, command: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("[RUN] {}", command);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
