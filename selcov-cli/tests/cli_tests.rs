//! End-to-end tests for the `selcov` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PAGE: &str = r#"<html><body>
<div class="foo"><p>1</p><p>2</p><span>a</span><span>b</span><span>c</span></div>
</body></html>"#;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), PAGE).unwrap();
    dir
}

fn selcov(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("selcov").unwrap();
    let _ = cmd.arg("--color").arg("never").arg(root).env_remove("SELCOV_LOG");
    cmd
}

#[test]
fn test_one_line_per_group() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("index.html")
        .arg(r#"[["div.foo"], null, [], ["p", "span"], ["a:deferred"]]"#)
        .assert()
        .success()
        .stdout("[1,[\"div.foo\"]]\n[0,null]\n[0,[]]\n[5,[\"p\",\"span\"]]\n[0,[\"a:deferred\"]]\n");
}

#[test]
fn test_missing_document_exits_one() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("missing.html")
        .arg(r#"[["p"]]"#)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("document not found"));
}

#[test]
fn test_malformed_selector_data_exits_two() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("index.html")
        .arg(r#"[["p"], 3]"#)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid selector data"));
}

#[test]
fn test_error_cause_printed_once() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("index.html")
        .arg(r#"[["p"], 3]"#)
        .assert()
        .code(2)
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("line 1 column").count() == 1
        }));
}

#[test]
fn test_selector_data_from_file() {
    let dir = site();
    let data = dir.path().join("rules.json");
    fs::write(&data, r#"[["span"]]"#).unwrap();

    let _ = selcov(dir.path())
        .arg("index.html")
        .arg(format!("@{}", data.display()))
        .assert()
        .success()
        .stdout("[3,[\"span\"]]\n");
}

#[test]
fn test_selector_data_from_stdin() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("index.html")
        .arg("-")
        .write_stdin(r#"[["div > p"]]"#)
        .assert()
        .success()
        .stdout("[2,[\"div > p\"]]\n");
}

#[test]
fn test_file_url_document() {
    let dir = site();
    let other = TempDir::new().unwrap();
    let url = format!("file://{}", dir.path().join("index.html").display());

    let _ = selcov(other.path())
        .arg(url)
        .arg(r#"[["p"]]"#)
        .assert()
        .success()
        .stdout("[2,[\"p\"]]\n");
}

#[test]
fn test_failing_selector_is_reported() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("index.html")
        .arg(r#"[["p:bogus", "p"], ["span"]]"#)
        .assert()
        .success()
        .stdout("[2,[\"p:bogus\",\"p\"]]\n[3,[\"span\"]]\n")
        .stderr(predicate::str::contains(
            "BUG: Problem matching selector: p:bogus",
        ));
}

#[test]
fn test_strip_first_and_summary() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("--strip")
        .arg("first")
        .arg("--summary")
        .arg("index.html")
        .arg(r#"[["p:before:before"], ["table"]]"#)
        .assert()
        .success()
        .stdout("[2,[\"p:before:before\"]]\n[0,[\"table\"]]\n")
        .stderr(predicate::str::contains(
            "1 of 2 groups matched, 2 selectors, 0 failed, 2 matches",
        ));
}

#[test]
fn test_print_tree() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("--print-tree")
        .arg("index.html")
        .arg("[]")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("<div class=\"foo\">"));
}

#[test]
fn test_bad_strip_mode_exits_two() {
    let dir = site();
    let _ = selcov(dir.path())
        .arg("--strip")
        .arg("some")
        .arg("index.html")
        .arg("[]")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}
