//! Core configuration types
//!
//! This module defines the data structures that represent a domestobot
//! configuration document. The `Raw*` types mirror the file layout field for
//! field; the validated types make the "exactly one execution form" rule a
//! structural property.

use serde::Deserialize;

/// Help text shown for a document without its own `help_message`
pub const DEFAULT_HELP: &str = "Your own trusty housekeeper.

Run `domestobot <step_name> --help` to get more information about that
particular step.";

/// Top-level document structure as written in the file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    /// Other documents to include as nested namespaces
    #[serde(default)]
    pub sub_domestobots: Vec<String>,

    /// Names to run in order when no step is named
    #[serde(default)]
    pub default_subcommands: Vec<String>,

    /// Steps defined in this document
    #[serde(default)]
    pub steps: Vec<RawStep>,

    /// Help text for this document's namespace
    #[serde(default)]
    pub help_message: Option<String>,

    /// Interpreter for shell-form commands (e.g., ["bash", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,
}

/// A step definition as written in the file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStep {
    /// Invocation name
    pub name: String,

    /// Help text
    pub doc: String,

    /// Printed before the step runs
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub commands: Vec<Vec<String>>,

    #[serde(default)]
    pub shell_command: Option<String>,

    #[serde(default)]
    pub shell_commands: Vec<String>,

    /// Platform-specific alternatives
    #[serde(default)]
    pub envs: Vec<RawEnvVariant>,
}

/// A platform-specific alternative as written in the file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEnvVariant {
    /// Platform identifier, compared with the platform probe
    pub os: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub commands: Vec<Vec<String>>,

    #[serde(default)]
    pub shell_command: Option<String>,

    #[serde(default)]
    pub shell_commands: Vec<String>,
}

/// A validated configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub sub_domestobots: Vec<String>,
    pub default_subcommands: Vec<String>,
    pub steps: Vec<Step>,
    pub help_message: Option<String>,
    pub interpreter: Option<Vec<String>>,
}

impl Document {
    /// Help text for this document, falling back to the built-in one
    pub fn help(&self) -> &str {
        self.help_message.as_deref().unwrap_or(DEFAULT_HELP)
    }

    /// Look up a step by exact name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.name == name)
    }
}

/// A validated step definition
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub doc: String,
    pub title: Option<String>,
    pub body: StepBody,
}

/// What a step runs
#[derive(Debug, Clone, PartialEq)]
pub enum StepBody {
    /// The same commands on every platform
    Direct(ExecForm),

    /// Platform-specific alternatives, first match wins
    Envs(Vec<EnvVariant>),
}

/// A validated platform-specific alternative
#[derive(Debug, Clone, PartialEq)]
pub struct EnvVariant {
    pub os: String,
    pub title: Option<String>,
    pub form: ExecForm,
}

/// The four ways a step can describe its commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecForm {
    /// One argument vector, run without a shell
    Command(Vec<String>),

    /// Several argument vectors, run one after another
    Commands(Vec<Vec<String>>),

    /// One line handed to the shell interpreter
    ShellCommand(String),

    /// Several lines handed to the shell interpreter
    ShellCommands(Vec<String>),
}

impl ExecForm {
    /// Field name of this form in the configuration file
    pub fn field_name(&self) -> &'static str {
        match self {
            ExecForm::Command(_) => "command",
            ExecForm::Commands(_) => "commands",
            ExecForm::ShellCommand(_) => "shell_command",
            ExecForm::ShellCommands(_) => "shell_commands",
        }
    }
}
