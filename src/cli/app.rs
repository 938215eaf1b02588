//! Main CLI application

use crate::cli::logging;
use crate::config::{load, root_config_path, ConfigTree, Document};
use crate::error::{DomestobotError, LoadError};
use crate::runner::{self, default_interpreter, platform, CommandRunner, Context, Namespace, RunMode, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Binary name used for the root command
const BIN_NAME: &str = "domestobot";

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Invocation tree built from the configuration
    namespace: Namespace,
    /// Interpreter for shell-form commands
    interpreter: Vec<String>,
}

impl App {
    /// Create app with a specific root config file
    ///
    /// A missing root config is not fatal: a warning is printed and the app
    /// starts with no steps.
    pub fn with_config_file(path: PathBuf) -> Result<Self, DomestobotError> {
        let tree = match load(&path) {
            Ok(tree) => tree,
            Err(e @ LoadError::NotFound(_)) if !path.exists() => {
                log::warn!("{}", e);
                eprintln!("{}\n", e.to_string().yellow());
                ConfigTree::from_document("root", path, Document::default())
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_tree(&tree, &platform::current())
    }

    /// Create app from an already loaded configuration tree
    pub fn from_tree(tree: &ConfigTree, platform: &str) -> Result<Self, DomestobotError> {
        let namespace = runner::build(tree, platform)?;
        let command = build_command(&namespace);
        let interpreter = tree
            .document
            .interpreter
            .clone()
            .unwrap_or_else(default_interpreter);

        Ok(App {
            command,
            namespace,
            interpreter,
        })
    }

    /// Invocation tree of this app
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), DomestobotError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with the given command line arguments
    pub fn run_from<I, T>(self, args: I) -> Result<(), DomestobotError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = self.command;
        command.build();
        let matches = command.clone().get_matches_from(args);

        if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
            clap_complete::generate(shell, &mut command, BIN_NAME, &mut io::stdout());
            return Ok(());
        }

        let mode = if matches.get_flag("dry-run") {
            RunMode::DryRun
        } else {
            RunMode::Default
        };

        let ctx = Context::new()
            .with_interpreter(self.interpreter)
            .with_verbosity(get_verbosity(&matches))
            .with_mode(mode);
        let runner = ctx.runner();

        dispatch(&self.namespace, &mut command, &matches, runner.as_ref(), &ctx)
    }
}

/// Walk the matched subcommands down the invocation tree and run the target
fn dispatch(
    namespace: &Namespace,
    command: &mut Command,
    matches: &ArgMatches,
    runner: &dyn CommandRunner,
    ctx: &Context,
) -> Result<(), DomestobotError> {
    let (name, sub_matches) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => {
            if namespace.has_default() {
                namespace.run_default(runner, ctx)?;
            } else {
                // No step specified, show help
                command.print_help()?;
                println!();
            }
            return Ok(());
        }
    };

    if let Some(unit) = namespace.unit(name) {
        unit.run(runner, ctx)?;
        return Ok(());
    }

    match (namespace.child(name), command.find_subcommand_mut(name)) {
        (Some(child), Some(sub_command)) => dispatch(child, sub_command, sub_matches, runner, ctx),
        _ => Err(DomestobotError::UnknownStep(name.to_string())),
    }
}

/// Build the clap command from the invocation tree
pub fn build_command(namespace: &Namespace) -> Command {
    Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(namespace.help.clone())
        .disable_help_subcommand(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the root config file")
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print commands for every step instead of running them")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print each command before running it")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script and exit")
                .value_parser(clap::value_parser!(Shell)),
        )
        .subcommands(subcommands(namespace))
}

/// One subcommand per step and per nested namespace
fn subcommands(namespace: &Namespace) -> Vec<Command> {
    let steps = namespace
        .units
        .iter()
        .map(|unit| Command::new(unit.name().to_string()).about(unit.doc().to_string()));

    let children = namespace.children.iter().map(|child| {
        Command::new(child.name.clone())
            .about(summary(&child.help))
            .long_about(child.help.clone())
            .disable_help_subcommand(true)
            .subcommands(subcommands(child))
    });

    steps.chain(children).collect()
}

/// First line of a help text
fn summary(help: &str) -> String {
    help.lines().next().unwrap_or_default().to_string()
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), DomestobotError> {
    logging::init();

    // The config decides which subcommands exist, so --file is read before clap parsing
    let args: Vec<OsString> = std::env::args_os().collect();
    let path = root_config_path(extract_file_arg(&args));

    let app = App::with_config_file(path)?;
    app.run_from(args)
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[OsString]) -> Option<PathBuf> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--file" || arg == "-f" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.to_str().and_then(|a| a.strip_prefix("--file=")) {
            return Some(PathBuf::from(path));
        }
    }
    None
}
