//! Tests for the staged coverage session.

use std::fs;

use selcov_coverage::{CoverageSession, LoadError, MemorySink, StripMode};
use tempfile::TempDir;

fn write_page(dir: &TempDir, name: &str, html: &str) {
    fs::write(dir.path().join(name), html).unwrap();
}

#[test]
fn test_open_prepare_run() {
    let dir = TempDir::new().unwrap();
    write_page(&dir, "index.html", "<ol><li>1</li><li>2</li></ol>");

    let opened = CoverageSession::open(dir.path(), "index.html").unwrap();
    assert_eq!(opened.document().element_count(), 6);

    let session = opened.prepare(StripMode::First);
    assert_eq!(session.strip_mode(), StripMode::First);

    let mut sink = MemorySink::default();
    let groups = vec![Some(vec!["li".to_string()]), None];
    let summary = session.run(&groups, &mut sink).unwrap();

    assert_eq!(sink.results.len(), 2);
    assert_eq!(sink.results[0].count(), 2);
    assert_eq!(summary.covered_groups, 1);
}

#[test]
fn test_relative_paths_resolve_against_root() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("pages")).unwrap();
    write_page(&dir, "pages/a.html", "<p></p>");

    let opened = CoverageSession::open(dir.path(), "pages/a.html").unwrap();
    assert!(opened.document().source_path.ends_with("a.html"));
}

#[test]
fn test_absolute_file_url_ignores_root() {
    let dir = TempDir::new().unwrap();
    write_page(&dir, "a.html", "<p></p>");
    let other = TempDir::new().unwrap();

    let url = format!("file://{}", dir.path().join("a.html").display());
    assert!(CoverageSession::open(other.path(), &url).is_ok());
}

#[test]
fn test_missing_document() {
    let dir = TempDir::new().unwrap();
    let err = CoverageSession::open(dir.path(), "nope.html").err().unwrap();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert_eq!(err.path(), dir.path().join("nope.html"));
}
