//! Tests for document loading.

use std::error::Error as _;
use std::fs;
use std::io;
use std::path::PathBuf;

use selcov_coverage::{LoadError, load_document, load_file, parse_html_string};
use tempfile::TempDir;

#[test]
fn test_parse_html_string_builds_dom() {
    let doc = parse_html_string(r#"<div class="foo"><p>Hi</p></div>"#);
    // html, head, body, div, p
    assert_eq!(doc.element_count(), 5);
    assert!(doc.source_path.is_empty());
    assert!(doc.parse_issues.is_empty());
}

#[test]
fn test_parse_issues_are_recorded() {
    let doc = parse_html_string("<div></span></div>");
    assert!(
        doc.parse_issues
            .iter()
            .any(|issue| issue == "unexpected end tag </span>")
    );
}

#[test]
fn test_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "<ul><li>a</li><li>b</li></ul>").unwrap();

    let doc = load_file(&path).unwrap();
    assert_eq!(doc.element_count(), 6);
    assert_eq!(doc.source_path, path.display().to_string());
}

#[test]
fn test_load_document_accepts_file_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "<p></p>").unwrap();

    let doc = load_document(&format!("file://{}", path.display())).unwrap();
    assert_eq!(doc.element_count(), 4);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.html");
    fs::write(&path, b"<p>caf\xe9</p>").unwrap();

    let doc = load_file(&path).unwrap();
    assert_eq!(doc.element_count(), 4);
    let p = doc
        .dom
        .elements()
        .find(|&id| doc.dom.as_element(id).is_some_and(|e| e.tag_name == "p"))
        .unwrap();
    assert_eq!(doc.dom.text_content(p), "caf\u{FFFD}");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.html");

    let err = load_file(&path).err().unwrap();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().starts_with("document not found: "));
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = TempDir::new().unwrap();
    let err = load_file(dir.path()).err().unwrap();
    assert!(matches!(err, LoadError::NotAFile { .. }));
}

#[test]
fn test_io_error_message_leaves_cause_to_source() {
    let err = LoadError::Io {
        path: PathBuf::from("page.html"),
        source: io::Error::other("disk on fire"),
    };
    assert_eq!(err.to_string(), "failed to read page.html");
    assert_eq!(err.source().unwrap().to_string(), "disk on fire");
}
