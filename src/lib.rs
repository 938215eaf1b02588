//! Domestobot - a config-driven runner for routine maintenance steps
//!
//! Steps are declared in TOML or YAML documents, grouped into namespaces by
//! sub-documents, and run as subcommands of a single binary.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{DomestobotError, Result};

/// Current version of Domestobot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
