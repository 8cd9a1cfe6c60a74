//! Selector coverage evaluation for the selcov harness.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a local HTML file and build its DOM
//! - **Selector Input** - parse the JSON array of selector groups
//! - **Custom Pseudo-Classes** - strip or pass through the harness extensions
//! - **Coverage Evaluation** - count matches per group and stream the results
//! - **Session** - the open, prepare, run pipeline tying the above together
//!
//! # Example
//!
//! ```
//! use selcov_coverage::{CoverageEvaluator, MemorySink, StripMode, parse_html_string};
//!
//! let doc = parse_html_string(r#"<div class="foo"><a></a></div>"#);
//! let groups = vec![Some(vec!["div.foo".to_string(), "a:deferred".to_string()]), None];
//!
//! let mut sink = MemorySink::default();
//! let summary = CoverageEvaluator::new(StripMode::All)
//!     .run(&doc.dom, &groups, &mut sink)
//!     .unwrap();
//!
//! assert_eq!(sink.results[0].count(), 2);
//! assert_eq!(sink.results[1].count(), 0);
//! assert_eq!(summary.groups, 2);
//! ```

/// Per-group evaluation, results and sinks.
pub mod evaluator;
/// Selector group input parsing.
pub mod input;
/// Document loading.
pub mod loader;
/// The harness's custom pseudo-classes and how they are stripped.
pub mod pseudo;
/// The three-stage open, prepare, run pipeline.
pub mod session;

pub use selcov_css as css;
pub use selcov_dom as dom;
pub use selcov_html as html;

pub use evaluator::{
    CoverageEvaluator, CoverageResult, CoverageSink, CoverageSummary, MemorySink, NdjsonSink,
    SelectorFailure,
};
pub use input::{InputError, SelectorGroup, SelectorSource, parse_selector_groups};
pub use loader::{LoadError, LoadedDocument, load_document, load_file, parse_html_string};
pub use pseudo::{CustomPseudo, StripMode, engine_config, strip_custom_pseudos};
pub use session::{CoverageSession, OpenedDocument, PreparedSession};
