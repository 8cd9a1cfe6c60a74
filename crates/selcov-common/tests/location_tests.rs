//! Tests for document location resolution and diagnostics formatting.

use std::path::{Path, PathBuf};

use selcov_common::location::{document_path, resolve_document_path};
use selcov_common::logging::level_for_verbosity;
use selcov_common::warning::{Severity, render_diagnostic, write_diagnostic};

#[test]
fn test_plain_path_is_unchanged() {
    assert_eq!(document_path("/tmp/page.html"), PathBuf::from("/tmp/page.html"));
    assert_eq!(document_path("page.html"), PathBuf::from("page.html"));
}

#[test]
fn test_plain_path_is_not_percent_decoded() {
    assert_eq!(document_path("/tmp/a%20b"), PathBuf::from("/tmp/a%20b"));
}

#[test]
fn test_file_url_becomes_path() {
    assert_eq!(
        document_path("file:///tmp/page.html"),
        PathBuf::from("/tmp/page.html")
    );
    assert_eq!(
        document_path("file://localhost/tmp/page.html"),
        PathBuf::from("/tmp/page.html")
    );
    assert_eq!(
        document_path("FILE:///tmp/page.html"),
        PathBuf::from("/tmp/page.html")
    );
}

#[test]
fn test_file_url_is_percent_decoded() {
    assert_eq!(document_path("file:///tmp/a%20b"), PathBuf::from("/tmp/a b"));
    assert_eq!(
        document_path("file:///tmp/a%2520b"),
        PathBuf::from("/tmp/a%20b")
    );
}

#[test]
fn test_remote_file_url_is_kept_literally() {
    assert_eq!(
        document_path("file://server/share/page.html"),
        PathBuf::from("file://server/share/page.html")
    );
}

#[test]
fn test_relative_path_resolves_against_root() {
    let resolved = resolve_document_path(Path::new("/srv/book"), "chapters/one.html");
    assert_eq!(resolved, PathBuf::from("/srv/book/chapters/one.html"));
}

#[test]
fn test_absolute_path_ignores_root() {
    let resolved = resolve_document_path(Path::new("/srv/book"), "/tmp/one.html");
    assert_eq!(resolved, PathBuf::from("/tmp/one.html"));

    let resolved = resolve_document_path(Path::new("/srv/book"), "file:///tmp/one.html");
    assert_eq!(resolved, PathBuf::from("/tmp/one.html"));
}

#[test]
fn test_diagnostic_without_color() {
    let mut out = Vec::new();
    write_diagnostic(&mut out, "Coverage", Severity::Error, "boom").unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "[selcov Coverage] boom\n");
}

#[test]
fn test_diagnostic_without_color_is_plain() {
    let line = render_diagnostic("HTML Parser", Severity::Warning, "stray tag", false);
    assert_eq!(line, "[selcov HTML Parser] stray tag");
}

#[test]
fn test_diagnostic_with_color_wraps_line() {
    let line = render_diagnostic("HTML Parser", Severity::Warning, "stray tag", true);
    assert!(line.contains("[selcov HTML Parser] stray tag"));
    assert!(line.starts_with("\u{1b}["));
}

#[test]
fn test_verbosity_levels() {
    assert_eq!(level_for_verbosity(0), "warn");
    assert_eq!(level_for_verbosity(1), "info");
    assert_eq!(level_for_verbosity(2), "debug");
    assert_eq!(level_for_verbosity(7), "debug");
}
