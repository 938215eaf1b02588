//! Recursive loading of a root document and its sub-documents

use crate::config::parse::parse_config_file;
use crate::config::types::Document;
use crate::error::{LoadError, LoadResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A loaded document together with its loaded sub-documents
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    /// Namespace name, derived from the file stem
    pub name: String,

    /// Path the document was read from
    pub path: PathBuf,

    /// The validated document
    pub document: Document,

    /// One child per `sub_domestobots` entry, in declared order
    pub children: Vec<ConfigTree>,
}

impl ConfigTree {
    /// Wrap a document that was not read from disk
    pub fn from_document(name: impl Into<String>, path: PathBuf, document: Document) -> Self {
        ConfigTree {
            name: name.into(),
            path,
            document,
            children: Vec::new(),
        }
    }
}

/// Load the document at `path` and every document it references
pub fn load(path: &Path) -> LoadResult<ConfigTree> {
    Loader::default().load_tree(path)
}

/// Tracks the chain of documents currently being loaded
#[derive(Debug, Default)]
struct Loader {
    active: Vec<PathBuf>,
}

impl Loader {
    fn load_tree(&mut self, path: &Path) -> LoadResult<ConfigTree> {
        let canonical = canonicalize(path)?;
        if self.active.contains(&canonical) {
            let mut chain: Vec<String> = self
                .active
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            chain.push(canonical.display().to_string());
            return Err(LoadError::CyclicReference(chain.join(" -> ")));
        }

        log::debug!("Loading config {}", path.display());
        let document = parse_config_file(path)?;

        self.active.push(canonical);
        let children = self.load_children(path, &document);
        self.active.pop();
        let children = children?;

        check_names(path, &document, &children)?;

        Ok(ConfigTree {
            name: namespace_name(path),
            path: path.to_path_buf(),
            document,
            children,
        })
    }

    fn load_children(&mut self, path: &Path, document: &Document) -> LoadResult<Vec<ConfigTree>> {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut children = Vec::with_capacity(document.sub_domestobots.len());
        for location in &document.sub_domestobots {
            let child_path = resolve_location(base_dir, location);
            log::trace!(
                "{} references sub-config {}",
                path.display(),
                child_path.display()
            );

            let child = self.load_tree(&child_path)?;
            if child.document.interpreter.is_some() {
                log::warn!(
                    "Ignoring `interpreter` in sub-config {}, only the root config sets it",
                    child_path.display()
                );
            }
            children.push(child);
        }
        Ok(children)
    }
}

/// Resolve a `sub_domestobots` entry against the directory of its document
pub fn resolve_location(base_dir: &Path, location: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(location).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

/// Namespace name of a document: its file stem
pub fn namespace_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn canonicalize(path: &Path) -> LoadResult<PathBuf> {
    dunce::canonicalize(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Parse {
            path: path.to_path_buf(),
            error: format!("failed to resolve path: {}", e),
        },
    })
}

/// Step names and namespace names share one invocation scope
fn check_names(path: &Path, document: &Document, children: &[ConfigTree]) -> LoadResult<()> {
    let mut names: HashSet<&str> = document.steps.iter().map(|s| s.name.as_str()).collect();

    for child in children {
        if !names.insert(child.name.as_str()) {
            return Err(LoadError::Schema {
                path: path.to_path_buf(),
                message: format!(
                    "sub-config '{}' clashes with another step or sub-config of the same name",
                    child.name
                ),
            });
        }
    }
    Ok(())
}
