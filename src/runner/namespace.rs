//! Invocation tree
//!
//! Projects a loaded [`ConfigTree`] onto named, runnable units: one unit per
//! step, one nested namespace per sub-config, and an optional default action
//! built from `default_subcommands`. Default subcommand names are bound to
//! their units while the tree is built, so a bad name fails before anything
//! runs.

use crate::config::{ConfigTree, Step};
use crate::error::{ExecutionError, ExecutionResult, LoadError, LoadResult};
use crate::runner::{execute_specs, resolve, CommandRunner, Context, ResolvedStep};

/// Separator for references into nested namespaces (`sub.step`)
pub const PATH_SEPARATOR: char = '.';

/// A runnable step bound to the platform it was built for
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    step: Step,
    platform: String,
}

impl Unit {
    /// Bind `step` to `platform`
    pub fn new(step: Step, platform: impl Into<String>) -> Self {
        Unit {
            step,
            platform: platform.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.step.name
    }

    pub fn doc(&self) -> &str {
        &self.step.doc
    }

    /// Title as declared on the step
    pub fn title(&self) -> Option<&str> {
        self.step.title.as_deref()
    }

    /// Commands this unit runs on its platform
    pub fn resolve(&self) -> ResolvedStep {
        resolve(&self.step, &self.platform)
    }

    /// Resolve and execute the step
    pub fn run(&self, runner: &dyn CommandRunner, ctx: &Context) -> ExecutionResult<()> {
        let resolved = self.resolve();
        log::info!(
            "Running step '{}' ({} command(s))",
            self.name(),
            resolved.specs.len()
        );

        execute_specs(&resolved.specs, resolved.title.as_deref(), runner, ctx).map_err(|e| {
            ExecutionError::InStep {
                step: self.name().to_string(),
                source: Box::new(e),
            }
        })
    }
}

/// One entry of a namespace's default action
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultEntry {
    /// Run a single step
    Step(Unit),

    /// Run the default action of a nested namespace
    Namespace(Namespace),
}

impl DefaultEntry {
    fn run(&self, runner: &dyn CommandRunner, ctx: &Context) -> ExecutionResult<()> {
        match self {
            DefaultEntry::Step(unit) => unit.run(runner, ctx),
            DefaultEntry::Namespace(namespace) => namespace.run_default(runner, ctx),
        }
    }
}

/// A named group of units and nested namespaces
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Name used to invoke this namespace
    pub name: String,

    /// Help text for the presentation layer
    pub help: String,

    /// Steps, in declared order
    pub units: Vec<Unit>,

    /// Sub-configs, in declared order
    pub children: Vec<Namespace>,

    /// What to run when the namespace is invoked without a name
    pub default_action: Option<Vec<DefaultEntry>>,
}

impl Namespace {
    /// Look up a step by exact name
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.name() == name)
    }

    /// Look up a nested namespace by exact name
    pub fn child(&self, name: &str) -> Option<&Namespace> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn has_default(&self) -> bool {
        self.default_action.is_some()
    }

    /// Run the default action, stopping at the first failing entry
    ///
    /// A namespace without default subcommands does nothing.
    pub fn run_default(&self, runner: &dyn CommandRunner, ctx: &Context) -> ExecutionResult<()> {
        for entry in self.default_action.iter().flatten() {
            entry.run(runner, ctx)?;
        }
        Ok(())
    }

    /// Every invocable path below this namespace, qualified with `.`
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.units.iter().map(|u| u.name().to_string()).collect();
        for child in &self.children {
            names.push(child.name.clone());
            names.extend(
                child
                    .names()
                    .into_iter()
                    .map(|name| format!("{}{}{}", child.name, PATH_SEPARATOR, name)),
            );
        }
        names
    }

    /// Bind a `default_subcommands` reference to an entry
    ///
    /// Exact names are tried first so step names containing the separator
    /// still resolve.
    fn bind(&self, reference: &str) -> Option<DefaultEntry> {
        if let Some(unit) = self.unit(reference) {
            return Some(DefaultEntry::Step(unit.clone()));
        }
        if let Some(child) = self.child(reference) {
            return Some(DefaultEntry::Namespace(child.clone()));
        }

        let (head, rest) = reference.split_once(PATH_SEPARATOR)?;
        self.child(head)?.bind(rest)
    }
}

/// Build the invocation tree for `platform`
pub fn build(tree: &ConfigTree, platform: &str) -> LoadResult<Namespace> {
    let children = tree
        .children
        .iter()
        .map(|child| build(child, platform))
        .collect::<LoadResult<Vec<_>>>()?;

    let mut namespace = Namespace {
        name: tree.name.clone(),
        help: tree.document.help().to_string(),
        units: tree
            .document
            .steps
            .iter()
            .map(|step| Unit::new(step.clone(), platform))
            .collect(),
        children,
        default_action: None,
    };

    if !tree.document.default_subcommands.is_empty() {
        let entries = tree
            .document
            .default_subcommands
            .iter()
            .map(|reference| bind_default(&namespace, reference, tree))
            .collect::<LoadResult<Vec<_>>>()?;
        namespace.default_action = Some(entries);
    }

    log::trace!(
        "Built namespace '{}' with {} step(s) and {} sub-config(s)",
        namespace.name,
        namespace.units.len(),
        namespace.children.len()
    );
    Ok(namespace)
}

fn bind_default(namespace: &Namespace, reference: &str, tree: &ConfigTree) -> LoadResult<DefaultEntry> {
    let schema_error = |message: String| LoadError::Schema {
        path: tree.path.clone(),
        message,
    };

    match namespace.bind(reference) {
        Some(DefaultEntry::Namespace(child)) if !child.has_default() => Err(schema_error(format!(
            "default subcommand '{}' names a sub-config without default_subcommands",
            reference
        ))),
        Some(entry) => Ok(entry),
        None => Err(schema_error(format!(
            "'{}' is not a valid step",
            reference
        ))),
    }
}
