//! CLI interface and argument parsing
//!
//! This module turns the invocation tree into clap subcommands, sets up
//! logging and dispatches to the step runner.

pub mod app;
pub mod logging;

// Re-export main types
pub use app::*;
