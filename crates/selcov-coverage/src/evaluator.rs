//! Coverage evaluation.
//!
//! For every selector group, in input order: strip the custom
//! pseudo-classes from each selector, run it against the document, and sum
//! the match counts. Counts are not deduplicated across the selectors of a
//! group. A selector the engine rejects is reported and counts as zero.

use std::fmt;
use std::io::{self, Write};

use selcov_common::warning::{Severity, write_diagnostic};
use selcov_css::{SelectorEngine, SelectorError};
use selcov_dom::DomTree;
use serde::{Deserialize, Serialize};

use crate::input::SelectorGroup;
use crate::pseudo::{StripMode, engine_config, strip_custom_pseudos};

/// `[count, group]` for one input group, serialized as a two-element array.
///
/// ```
/// use selcov_coverage::CoverageResult;
///
/// let result = CoverageResult(3, Some(vec!["p".to_string()]));
/// assert_eq!(serde_json::to_string(&result).unwrap(), r#"[3,["p"]]"#);
/// assert_eq!(serde_json::to_string(&CoverageResult(0, None)).unwrap(), "[0,null]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult(pub usize, pub SelectorGroup);

impl CoverageResult {
    /// Total matches over the group's selectors.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.0
    }

    /// The group exactly as it was given.
    #[must_use]
    pub fn group(&self) -> Option<&[String]> {
        self.1.as_deref()
    }
}

/// A selector the engine could not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorFailure {
    /// The selector as written in the input.
    pub selector: String,
    /// The text handed to the engine after stripping.
    pub cleaned: String,
    /// What the engine reported.
    pub error: SelectorError,
}

impl fmt::Display for SelectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BUG: Problem matching selector: {} ({})",
            self.cleaned, self.error
        )
    }
}

/// Totals over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    /// Input groups, including null and empty ones.
    pub groups: usize,
    /// Groups whose count is non-zero.
    pub covered_groups: usize,
    /// Selectors handed to the engine or skipped as empty after stripping.
    pub selectors: usize,
    /// Selectors the engine rejected.
    pub failures: usize,
    /// Sum of all group counts.
    pub total_matches: usize,
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} groups matched, {} selectors, {} failed, {} matches",
            self.covered_groups, self.groups, self.selectors, self.failures, self.total_matches
        )
    }
}

/// Receives results and failures as they are produced.
pub trait CoverageSink {
    /// One finished group.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying output.
    fn result(&mut self, result: &CoverageResult) -> io::Result<()>;

    /// One rejected selector, before the result of its group.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying output.
    fn failure(&mut self, failure: &SelectorFailure) -> io::Result<()>;

    /// Called once after the last group.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying output.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes each result as one compact JSON line to `results`, and failures
/// as diagnostics to `diagnostics`.
pub struct NdjsonSink<R: Write, D: Write> {
    results: R,
    diagnostics: D,
}

impl<R: Write, D: Write> NdjsonSink<R, D> {
    /// Create a sink over the two writers.
    #[must_use]
    pub const fn new(results: R, diagnostics: D) -> Self {
        Self {
            results,
            diagnostics,
        }
    }

    /// Give back the writers.
    #[must_use]
    pub fn into_inner(self) -> (R, D) {
        (self.results, self.diagnostics)
    }
}

impl<R: Write, D: Write> CoverageSink for NdjsonSink<R, D> {
    fn result(&mut self, result: &CoverageResult) -> io::Result<()> {
        serde_json::to_writer(&mut self.results, result)?;
        writeln!(self.results)
    }

    fn failure(&mut self, failure: &SelectorFailure) -> io::Result<()> {
        write_diagnostic(
            &mut self.diagnostics,
            "Coverage",
            Severity::Error,
            &failure.to_string(),
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.results.flush()?;
        self.diagnostics.flush()
    }
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    /// Results in input order.
    pub results: Vec<CoverageResult>,
    /// Failures in the order they happened.
    pub failures: Vec<SelectorFailure>,
}

impl CoverageSink for MemorySink {
    fn result(&mut self, result: &CoverageResult) -> io::Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn failure(&mut self, failure: &SelectorFailure) -> io::Result<()> {
        self.failures.push(failure.clone());
        Ok(())
    }
}

/// Counts selector matches with the custom pseudo-classes registered.
#[derive(Debug, Clone)]
pub struct CoverageEvaluator {
    engine: SelectorEngine,
    strip_mode: StripMode,
}

impl CoverageEvaluator {
    /// Build an evaluator whose engine knows every custom pseudo-class.
    #[must_use]
    pub fn new(strip_mode: StripMode) -> Self {
        Self {
            engine: SelectorEngine::new(engine_config()),
            strip_mode,
        }
    }

    /// The stripping mode in effect.
    #[must_use]
    pub const fn strip_mode(&self) -> StripMode {
        self.strip_mode
    }

    /// Matches for one selector.
    ///
    /// A selector that is empty after stripping matches nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorFailure`] if the engine rejects the cleaned text.
    pub fn count_selector(&self, tree: &DomTree, selector: &str) -> Result<usize, SelectorFailure> {
        let cleaned = strip_custom_pseudos(selector, self.strip_mode);
        if cleaned.trim().is_empty() {
            tracing::debug!(selector, "empty after stripping");
            return Ok(0);
        }
        match self.engine.select(tree, &cleaned) {
            Ok(matched) => {
                tracing::debug!(selector, cleaned = %cleaned, count = matched.len(), "matched");
                Ok(matched.len())
            }
            Err(error) => Err(SelectorFailure {
                selector: selector.to_string(),
                cleaned,
                error,
            }),
        }
    }

    /// Evaluate every group in order, streaming into `sink`.
    ///
    /// Exactly one result is produced per group. Failures are passed to the
    /// sink before the result of the group they belong to.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the sink; evaluation stops there.
    pub fn run<S: CoverageSink + ?Sized>(
        &self,
        tree: &DomTree,
        groups: &[SelectorGroup],
        sink: &mut S,
    ) -> io::Result<CoverageSummary> {
        let mut summary = CoverageSummary::default();

        for group in groups {
            let mut count = 0;
            for selector in group.iter().flatten() {
                summary.selectors += 1;
                match self.count_selector(tree, selector) {
                    Ok(matched) => count += matched,
                    Err(failure) => {
                        summary.failures += 1;
                        sink.failure(&failure)?;
                    }
                }
            }

            summary.groups += 1;
            summary.total_matches += count;
            if count > 0 {
                summary.covered_groups += 1;
            }
            sink.result(&CoverageResult(count, group.clone()))?;
        }

        sink.finish()?;
        tracing::info!(
            groups = summary.groups,
            covered = summary.covered_groups,
            failures = summary.failures,
            "coverage run finished"
        );
        Ok(summary)
    }
}
