//! Common utilities for selcov.
//!
//! This crate provides shared infrastructure used by all selcov components:
//! - **Warning System** - colored stderr diagnostics, deduplicated where noisy
//! - **Logging** - `tracing` subscriber setup for the command-line harness
//! - **Locations** - resolving document paths and `file://` URLs

pub mod location;
pub mod logging;
pub mod warning;
