//! Configuration validation
//!
//! This module turns raw documents into validated ones, enforcing that every
//! step and env variant has exactly one execution form and that step names
//! are unique within a document.

use crate::config::types::{
    Document, EnvVariant, ExecForm, RawDocument, RawEnvVariant, RawStep, Step, StepBody,
};
use crate::error::{ConfigError, ConfigResult, LoadError, LoadResult};
use std::collections::HashSet;
use std::path::Path;

/// Validate a complete document read from `path`
pub fn validate_document(raw: RawDocument, path: &Path) -> LoadResult<Document> {
    let mut seen = HashSet::new();
    for step in &raw.steps {
        if step.name.is_empty() {
            return Err(LoadError::Schema {
                path: path.to_path_buf(),
                message: "step names must not be empty".to_string(),
            });
        }
        if !seen.insert(step.name.as_str()) {
            return Err(LoadError::Schema {
                path: path.to_path_buf(),
                message: format!("step '{}' is defined more than once", step.name),
            });
        }
    }

    let steps = raw
        .steps
        .into_iter()
        .map(validate_step)
        .collect::<ConfigResult<Vec<_>>>()
        .map_err(|source| LoadError::Step {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(interpreter) = &raw.interpreter {
        if interpreter.first().map_or(true, |program| program.is_empty()) {
            return Err(LoadError::Schema {
                path: path.to_path_buf(),
                message: "interpreter must name a program".to_string(),
            });
        }
    }

    Ok(Document {
        sub_domestobots: raw.sub_domestobots,
        default_subcommands: raw.default_subcommands,
        steps,
        help_message: raw.help_message,
        interpreter: raw.interpreter,
    })
}

/// Validate a single step
pub fn validate_step(raw: RawStep) -> ConfigResult<Step> {
    let location = format!("step '{}'", raw.name);
    let mut forms = collect_forms(
        raw.command,
        raw.commands,
        raw.shell_command,
        raw.shell_commands,
    );

    let body = match (forms.len(), raw.envs.is_empty()) {
        (1, true) => {
            let form = forms.remove(0);
            check_argvs(&form, &location)?;
            StepBody::Direct(form)
        }
        (0, false) => {
            let variants = raw
                .envs
                .into_iter()
                .enumerate()
                .map(|(index, variant)| {
                    validate_variant(variant, &format!("{location}, envs[{index}]"))
                })
                .collect::<ConfigResult<Vec<_>>>()?;
            StepBody::Envs(variants)
        }
        (0, true) => {
            return Err(ConfigError::MissingForm {
                location,
                allows_envs: true,
            })
        }
        _ => {
            let mut found: Vec<&'static str> = forms.iter().map(ExecForm::field_name).collect();
            if !raw.envs.is_empty() {
                found.push("envs");
            }
            return Err(ConfigError::AmbiguousForm {
                location,
                found,
                allows_envs: true,
            });
        }
    };

    Ok(Step {
        name: raw.name,
        doc: raw.doc,
        title: non_empty(raw.title),
        body,
    })
}

/// Validate one env variant of a step
fn validate_variant(raw: RawEnvVariant, location: &str) -> ConfigResult<EnvVariant> {
    let mut forms = collect_forms(
        raw.command,
        raw.commands,
        raw.shell_command,
        raw.shell_commands,
    );

    match forms.len() {
        0 => Err(ConfigError::MissingForm {
            location: location.to_string(),
            allows_envs: false,
        }),
        1 => {
            let form = forms.remove(0);
            check_argvs(&form, location)?;
            Ok(EnvVariant {
                os: raw.os,
                title: non_empty(raw.title),
                form,
            })
        }
        _ => Err(ConfigError::AmbiguousForm {
            location: location.to_string(),
            found: forms.iter().map(ExecForm::field_name).collect(),
            allows_envs: false,
        }),
    }
}

/// Gather every execution form that is present and non-empty
fn collect_forms(
    command: Vec<String>,
    commands: Vec<Vec<String>>,
    shell_command: Option<String>,
    shell_commands: Vec<String>,
) -> Vec<ExecForm> {
    let mut forms = Vec::new();
    if !command.is_empty() {
        forms.push(ExecForm::Command(command));
    }
    if !commands.is_empty() {
        forms.push(ExecForm::Commands(commands));
    }
    if let Some(line) = non_empty(shell_command) {
        forms.push(ExecForm::ShellCommand(line));
    }
    if !shell_commands.is_empty() {
        forms.push(ExecForm::ShellCommands(shell_commands));
    }
    forms
}

/// Every argv needs a program to spawn
fn check_argvs(form: &ExecForm, location: &str) -> ConfigResult<()> {
    let argvs: &[Vec<String>] = match form {
        ExecForm::Command(argv) => std::slice::from_ref(argv),
        ExecForm::Commands(argvs) => argvs,
        ExecForm::ShellCommand(_) | ExecForm::ShellCommands(_) => return Ok(()),
    };

    match argvs.iter().position(|argv| argv.first().map_or(true, String::is_empty)) {
        Some(index) => Err(ConfigError::EmptyCommand {
            location: location.to_string(),
            index,
        }),
        None => Ok(()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
