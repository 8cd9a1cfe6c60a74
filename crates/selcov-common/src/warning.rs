//! Diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML parser to report recoverable problems, and by the
//! coverage evaluator to report selectors the engine could not match.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether diagnostics are rendered with ANSI colors.
static COLOR: AtomicBool = AtomicBool::new(false);

/// How loud a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable problem in the input (rendered yellow).
    Warning,
    /// A selector or document could not be processed (rendered red).
    Error,
}

/// Enable or disable ANSI colors for every diagnostic printed afterwards.
pub fn set_color_enabled(enabled: bool) {
    COLOR.store(enabled, Ordering::Relaxed);
}

/// Returns true if diagnostics are currently colored.
#[must_use]
pub fn color_enabled() -> bool {
    COLOR.load(Ordering::Relaxed)
}

/// Render a single diagnostic line using the global color setting.
///
/// # Example
/// ```
/// use selcov_common::warning::{Severity, format_diagnostic, set_color_enabled};
///
/// set_color_enabled(false);
/// let line = format_diagnostic("Coverage", Severity::Error, "bad selector");
/// assert_eq!(line, "[selcov Coverage] bad selector");
/// ```
#[must_use]
pub fn format_diagnostic(component: &str, severity: Severity, message: &str) -> String {
    render_diagnostic(component, severity, message, color_enabled())
}

/// Render a single diagnostic line, without the trailing newline.
#[must_use]
pub fn render_diagnostic(component: &str, severity: Severity, message: &str, color: bool) -> String {
    let line = format!("[selcov {component}] {message}");
    if !color {
        return line;
    }
    match severity {
        Severity::Warning => line.yellow().to_string(),
        Severity::Error => line.red().to_string(),
    }
}

/// Write one diagnostic line to `out`.
///
/// # Errors
///
/// Returns any I/O error raised by the underlying writer.
pub fn write_diagnostic(
    out: &mut impl Write,
    component: &str,
    severity: Severity,
    message: &str,
) -> io::Result<()> {
    writeln!(out, "{}", format_diagnostic(component, severity, message))
}

/// Report a diagnostic on stderr, every time it is called.
pub fn report(component: &str, severity: Severity, message: &str) {
    let mut stderr = io::stderr().lock();
    // Nowhere left to report a failing stderr.
    let _ = write_diagnostic(&mut stderr, component, severity, message);
}

/// Warn about a recoverable problem (prints once per unique message)
///
/// Returns true if the warning was printed, false if it was a repeat.
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "unexpected end tag </span>");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        report(component, Severity::Warning, message);
    }
    should_print
}

/// Clear all recorded warnings (call when loading a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
