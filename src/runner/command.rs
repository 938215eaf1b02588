//! Command execution
//!
//! This module runs resolved command specs, either by spawning processes or,
//! in dry-run mode, by printing them.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{CommandSpec, Context};
use std::io;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Outcome of one finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl RunStatus {
    /// A successful run
    pub fn ok() -> Self {
        RunStatus {
            success: true,
            code: Some(0),
        }
    }

    /// A run that exited with `code`
    pub fn exited(code: i32) -> Self {
        RunStatus {
            success: code == 0,
            code: Some(code),
        }
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        RunStatus {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Something that can carry out a single command spec
pub trait CommandRunner {
    /// Run one command to completion
    ///
    /// An `Err` means the command could not be started at all.
    fn run(&self, spec: &CommandSpec) -> io::Result<RunStatus>;
}

/// Spawns real processes with inherited stdio
#[derive(Debug, Clone)]
pub struct SystemRunner {
    interpreter: Vec<String>,
}

impl SystemRunner {
    /// Create a runner that hands shell lines to `interpreter`
    pub fn new(interpreter: Vec<String>) -> Self {
        SystemRunner { interpreter }
    }

    fn build(&self, spec: &CommandSpec) -> io::Result<StdCommand> {
        let (program, args) = match spec {
            CommandSpec::Argv(argv) => match argv.split_first() {
                Some((program, args)) => (program, args.to_vec()),
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "empty argument vector",
                    ))
                }
            },
            CommandSpec::Shell(line) => match self.interpreter.split_first() {
                Some((program, args)) => {
                    let mut args = args.to_vec();
                    args.push(line.clone());
                    (program, args)
                }
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "no shell interpreter configured",
                    ))
                }
            },
        };

        let mut command = StdCommand::new(program);
        command.args(args);
        Ok(command)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<RunStatus> {
        let mut command = self.build(spec)?;

        // Stream output live
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        let status = command.status()?;
        Ok(status.into())
    }
}

/// Prints commands instead of running them
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunner;

impl CommandRunner for DryRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<RunStatus> {
        match spec {
            CommandSpec::Argv(argv) => println!("{:?}", argv),
            CommandSpec::Shell(line) => println!("{}", line),
        }
        Ok(RunStatus::ok())
    }
}

/// Run `specs` in order, stopping at the first failure
///
/// The title, if any, is printed before the first command. An empty list is a
/// successful no-op and prints nothing.
pub fn execute_specs(
    specs: &[CommandSpec],
    title: Option<&str>,
    runner: &dyn CommandRunner,
    ctx: &Context,
) -> ExecutionResult<()> {
    if specs.is_empty() {
        return Ok(());
    }

    if let Some(title) = title {
        ctx.print_title(title);
    }

    for (index, spec) in specs.iter().enumerate() {
        execute_command(index, spec, runner, ctx)?;
    }

    Ok(())
}

/// Run a single command spec
pub fn execute_command(
    index: usize,
    spec: &CommandSpec,
    runner: &dyn CommandRunner,
    ctx: &Context,
) -> ExecutionResult<()> {
    let command = spec.to_string();
    ctx.print_command(&command);
    log::debug!("Running command {}: {}", index, command);

    let status = runner
        .run(spec)
        .map_err(|source| ExecutionError::SpawnFailure {
            index,
            command: command.clone(),
            source,
        })?;

    if !status.success {
        log::error!("Command {} (`{}`) exited with {:?}", index, command, status.code);
        return Err(ExecutionError::NonZeroExit {
            index,
            command,
            code: status.code,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every spec and answers with scripted exit codes
    struct ScriptedRunner {
        codes: Vec<i32>,
        seen: RefCell<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        fn new(codes: Vec<i32>) -> Self {
            ScriptedRunner {
                codes,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> io::Result<RunStatus> {
            let mut seen = self.seen.borrow_mut();
            let code = self.codes.get(seen.len()).copied().unwrap_or(0);
            seen.push(spec.clone());
            Ok(RunStatus::exited(code))
        }
    }

    fn shell(line: &str) -> CommandSpec {
        CommandSpec::Shell(line.to_string())
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let runner = ScriptedRunner::new(vec![0, 2, 0]);
        let specs = vec![shell("A"), shell("B"), shell("C")];

        let result = execute_specs(&specs, None, &runner, &Context::new());

        match result {
            Err(ExecutionError::NonZeroExit { index, code, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(code, Some(2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*runner.seen.borrow(), vec![shell("A"), shell("B")]);
    }

    #[test]
    fn test_execute_empty_list_is_success() {
        let runner = ScriptedRunner::new(vec![]);
        let result = execute_specs(&[], Some("Never shown"), &runner, &Context::new());

        assert!(result.is_ok());
        assert!(runner.seen.borrow().is_empty());
    }

    #[test]
    fn test_execute_simple_command() {
        let runner = SystemRunner::new(vec!["sh".to_string(), "-c".to_string()]);
        let spec = CommandSpec::Argv(vec!["echo".to_string(), "test".to_string()]);

        let result = execute_command(0, &spec, &runner, &Context::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_execute_shell_command() {
        let runner = SystemRunner::new(vec!["sh".to_string(), "-c".to_string()]);

        let result = execute_command(0, &shell("true && echo piped | cat"), &runner, &Context::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_execute_failing_command() {
        let runner = SystemRunner::new(vec!["sh".to_string(), "-c".to_string()]);

        let result = execute_command(0, &shell("exit 7"), &runner, &Context::new());
        assert!(matches!(
            result,
            Err(ExecutionError::NonZeroExit { code: Some(7), .. })
        ));
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let runner = SystemRunner::new(vec!["sh".to_string(), "-c".to_string()]);
        let spec = CommandSpec::Argv(vec!["nonexistent_command_xyz".to_string()]);

        let result = execute_command(3, &spec, &runner, &Context::new());
        assert!(matches!(
            result,
            Err(ExecutionError::SpawnFailure { index: 3, .. })
        ));
    }

    #[test]
    fn test_argv_is_not_shell_interpreted() {
        let runner = SystemRunner::new(vec!["sh".to_string(), "-c".to_string()]);
        // Passed as a literal argument, so the `false` after `;` never runs
        let spec = CommandSpec::Argv(vec!["echo".to_string(), "a; false".to_string()]);

        let result = execute_command(0, &spec, &runner, &Context::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_dry_runner_always_succeeds() {
        let result = DryRunner.run(&shell("exit 1")).unwrap();
        assert!(result.success);
    }
}
