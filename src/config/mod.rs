//! Configuration parsing and validation
//!
//! This module handles parsing of domestobot configuration documents,
//! validation of their structure and recursive loading of sub-configs.

pub mod load;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use load::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
