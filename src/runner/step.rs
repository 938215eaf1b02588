//! Step resolution
//!
//! Turns a validated step and a platform identifier into the concrete list of
//! commands to run. Resolution is pure: the same step and platform always give
//! the same result.

use crate::config::{ExecForm, Step, StepBody};
use crate::runner::platform::select_variant;
use std::fmt;

/// One process invocation, independent of platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Program and arguments, spawned without a shell
    Argv(Vec<String>),

    /// A line evaluated by the shell interpreter
    Shell(String),
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Argv(argv) => write!(f, "{}", argv.join(" ")),
            CommandSpec::Shell(line) => write!(f, "{}", line),
        }
    }
}

/// A step resolved for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    /// Title to show before running, if any
    pub title: Option<String>,

    /// Commands in execution order; empty means nothing to do
    pub specs: Vec<CommandSpec>,
}

/// Resolve a step for `platform`
///
/// For `envs` steps the first variant whose `os` equals `platform` is used;
/// without a match the step resolves to no commands at all.
pub fn resolve(step: &Step, platform: &str) -> ResolvedStep {
    match &step.body {
        StepBody::Direct(form) => ResolvedStep {
            title: step.title.clone(),
            specs: expand(form),
        },
        StepBody::Envs(variants) => match select_variant(variants, platform) {
            Some(variant) => ResolvedStep {
                title: variant.title.clone().or_else(|| step.title.clone()),
                specs: expand(&variant.form),
            },
            None => {
                log::debug!(
                    "Step '{}' has no variant for platform '{}'",
                    step.name,
                    platform
                );
                ResolvedStep {
                    title: None,
                    specs: Vec::new(),
                }
            }
        },
    }
}

/// Expand an execution form into command specs
pub fn expand(form: &ExecForm) -> Vec<CommandSpec> {
    match form {
        ExecForm::Command(argv) => vec![CommandSpec::Argv(argv.clone())],
        ExecForm::Commands(argvs) => argvs.iter().cloned().map(CommandSpec::Argv).collect(),
        ExecForm::ShellCommand(line) => vec![CommandSpec::Shell(line.clone())],
        ExecForm::ShellCommands(lines) => lines.iter().cloned().map(CommandSpec::Shell).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvVariant;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn step(body: StepBody) -> Step {
        Step {
            name: "step".to_string(),
            doc: "doc".to_string(),
            title: Some("Step title".to_string()),
            body,
        }
    }

    fn variant(os: &str, title: Option<&str>, form: ExecForm) -> EnvVariant {
        EnvVariant {
            os: os.to_string(),
            title: title.map(str::to_string),
            form,
        }
    }

    #[test]
    fn test_resolve_command() {
        let step = step(StepBody::Direct(ExecForm::Command(argv(&["echo", "Hello!"]))));

        let resolved = resolve(&step, "Linux");
        assert_eq!(resolved.specs, vec![CommandSpec::Argv(argv(&["echo", "Hello!"]))]);
        assert_eq!(resolved.title.as_deref(), Some("Step title"));
    }

    #[test]
    fn test_resolve_commands_keeps_order() {
        let step = step(StepBody::Direct(ExecForm::Commands(vec![
            argv(&["echo", "First echo"]),
            argv(&["echo", "Second echo"]),
        ])));

        let resolved = resolve(&step, "Linux");
        assert_eq!(
            resolved.specs,
            vec![
                CommandSpec::Argv(argv(&["echo", "First echo"])),
                CommandSpec::Argv(argv(&["echo", "Second echo"])),
            ]
        );
    }

    #[test]
    fn test_resolve_shell_forms() {
        let single = step(StepBody::Direct(ExecForm::ShellCommand("ls *.toml | wc -l".to_string())));
        assert_eq!(
            resolve(&single, "Linux").specs,
            vec![CommandSpec::Shell("ls *.toml | wc -l".to_string())]
        );

        let many = step(StepBody::Direct(ExecForm::ShellCommands(vec![
            "echo a".to_string(),
            "echo b".to_string(),
        ])));
        assert_eq!(
            resolve(&many, "Linux").specs,
            vec![
                CommandSpec::Shell("echo a".to_string()),
                CommandSpec::Shell("echo b".to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_envs_first_match_wins() {
        let step = step(StepBody::Envs(vec![
            variant("Darwin", None, ExecForm::Command(argv(&["brew", "upgrade"]))),
            variant("Linux", Some("Upgrading with paru"), ExecForm::Command(argv(&["paru"]))),
            variant("Linux", None, ExecForm::Command(argv(&["apt", "upgrade"]))),
        ]));

        let resolved = resolve(&step, "Linux");
        assert_eq!(resolved.specs, vec![CommandSpec::Argv(argv(&["paru"]))]);
        assert_eq!(resolved.title.as_deref(), Some("Upgrading with paru"));
    }

    #[test]
    fn test_resolve_envs_falls_back_to_step_title() {
        let step = step(StepBody::Envs(vec![variant(
            "Darwin",
            None,
            ExecForm::ShellCommand("brew update".to_string()),
        )]));

        let resolved = resolve(&step, "Darwin");
        assert_eq!(resolved.title.as_deref(), Some("Step title"));
    }

    #[test]
    fn test_resolve_envs_without_match_is_empty() {
        let step = step(StepBody::Envs(vec![variant(
            "Darwin",
            None,
            ExecForm::Command(argv(&["brew"])),
        )]));

        let resolved = resolve(&step, "Unknown OS");
        assert!(resolved.specs.is_empty());
        assert!(resolved.title.is_none());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let step = step(StepBody::Envs(vec![
            variant("Linux", None, ExecForm::ShellCommands(vec!["echo 1".to_string()])),
            variant("Darwin", None, ExecForm::Command(argv(&["echo", "2"]))),
        ]));

        for platform in ["Linux", "Darwin", "Windows"] {
            assert_eq!(resolve(&step, platform), resolve(&step, platform));
        }
    }

    #[test]
    fn test_command_spec_display() {
        assert_eq!(CommandSpec::Argv(argv(&["git", "fetch"])).to_string(), "git fetch");
        assert_eq!(CommandSpec::Shell("echo $HOME".to_string()).to_string(), "echo $HOME");
    }
}
