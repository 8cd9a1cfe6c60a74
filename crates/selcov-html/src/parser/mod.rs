//! HTML parser module for tree construction.

/// Tree builder implementation.
pub mod core;

pub use self::core::{HTMLParser, InsertionMode, ParseIssue, format_tree};
