//! The coverage pipeline as three typed stages.
//!
//! ```text
//! CoverageSession::open ──► OpenedDocument ──prepare──► PreparedSession ──run──► CoverageSummary
//!          │
//!          └── LoadError (terminal, nothing is evaluated)
//! ```
//!
//! Each stage consumes the previous one, so results can only be produced
//! for a document that loaded successfully, and only once the engine has
//! its custom pseudo-classes registered.

use std::io;
use std::path::Path;

use selcov_common::location::resolve_document_path;
use selcov_common::warning::clear_warnings;

use crate::evaluator::{CoverageEvaluator, CoverageSink, CoverageSummary};
use crate::input::SelectorGroup;
use crate::loader::{LoadError, LoadedDocument, load_file};
use crate::pseudo::StripMode;

/// Entry point of the pipeline.
pub struct CoverageSession;

impl CoverageSession {
    /// Resolve `location` (a path or `file://` URL) against `root` and load it.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the document cannot be loaded.
    pub fn open(root: &Path, location: &str) -> Result<OpenedDocument, LoadError> {
        let path = resolve_document_path(root, location);
        tracing::info!(root = %root.display(), document = %path.display(), "opening document");
        clear_warnings();
        let document = load_file(&path)?;
        Ok(OpenedDocument { document })
    }
}

/// A loaded document, not yet ready to evaluate.
pub struct OpenedDocument {
    document: LoadedDocument,
}

impl OpenedDocument {
    /// Wrap an already parsed document.
    #[must_use]
    pub const fn from_document(document: LoadedDocument) -> Self {
        Self { document }
    }

    /// The loaded document.
    #[must_use]
    pub const fn document(&self) -> &LoadedDocument {
        &self.document
    }

    /// Register the custom pseudo-classes and fix the stripping mode.
    #[must_use]
    pub fn prepare(self, strip_mode: StripMode) -> PreparedSession {
        tracing::debug!(%strip_mode, "preparing selector engine");
        PreparedSession {
            document: self.document,
            evaluator: CoverageEvaluator::new(strip_mode),
        }
    }
}

/// A document with a configured engine, ready to evaluate selector groups.
pub struct PreparedSession {
    document: LoadedDocument,
    evaluator: CoverageEvaluator,
}

impl PreparedSession {
    /// The loaded document.
    #[must_use]
    pub const fn document(&self) -> &LoadedDocument {
        &self.document
    }

    /// The stripping mode in effect.
    #[must_use]
    pub const fn strip_mode(&self) -> StripMode {
        self.evaluator.strip_mode()
    }

    /// Evaluate `groups` in order, one result per group, into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the sink.
    pub fn run<S: CoverageSink + ?Sized>(
        &self,
        groups: &[SelectorGroup],
        sink: &mut S,
    ) -> io::Result<CoverageSummary> {
        self.evaluator.run(&self.document.dom, groups, sink)
    }
}
