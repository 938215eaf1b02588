//! Step execution engine
//!
//! This module resolves steps for the current platform, runs their commands
//! and assembles the invocation tree exposed to the CLI.

pub mod command;
pub mod context;
pub mod namespace;
pub mod platform;
pub mod step;

// Re-export main types
pub use command::*;
pub use context::*;
pub use namespace::*;
pub use step::*;
