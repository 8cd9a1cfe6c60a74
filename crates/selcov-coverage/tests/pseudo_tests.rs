//! Tests for custom pseudo-class stripping.

use std::str::FromStr;

use quickcheck_macros::quickcheck;
use selcov_coverage::{CustomPseudo, StripMode, engine_config, strip_custom_pseudos};

fn strip_all(selector: &str) -> String {
    strip_custom_pseudos(selector, StripMode::All)
}

fn strip_first(selector: &str) -> String {
    strip_custom_pseudos(selector, StripMode::First)
}

#[test]
fn test_every_custom_pseudo_is_registered() {
    let config = engine_config();
    let names: Vec<&str> = config.pass_through_names().collect();
    assert_eq!(
        names,
        vec!["after", "before", "deferred", "match", "outside", "pass"]
    );
}

#[test]
fn test_only_argument_less_pseudos_are_stripped() {
    assert!(CustomPseudo::Deferred.is_stripped());
    assert!(CustomPseudo::Outside.is_stripped());
    assert!(!CustomPseudo::Pass.is_stripped());
    assert!(!CustomPseudo::Match.is_stripped());
    assert_eq!(CustomPseudo::Outside.name(), "outside");
}

#[test]
fn test_strip_mode_parsing() {
    assert_eq!(StripMode::from_str("all"), Ok(StripMode::All));
    assert_eq!(StripMode::from_str("FIRST"), Ok(StripMode::First));
    assert!(StripMode::from_str("some").is_err());
    assert_eq!(StripMode::default(), StripMode::All);
    assert_eq!(StripMode::First.to_string(), "first");
}

#[test]
fn test_single_and_double_colon_forms() {
    assert_eq!(strip_all("a:deferred"), "a");
    assert_eq!(strip_all("p::after"), "p");
    assert_eq!(strip_all("div::outside > p:BEFORE"), "div > p");
}

#[test]
fn test_repeated_pseudo_by_mode() {
    assert_eq!(strip_all("a:before:before"), "a");
    assert_eq!(strip_first("a:before:before"), "a:before");
    // First mode tracks each name separately.
    assert_eq!(strip_first("a:after:before:after"), "a:after");
}

#[test]
fn test_whole_identifiers_only() {
    assert_eq!(strip_all("a:beforehand"), "a:beforehand");
    assert_eq!(strip_all("a:after-x"), "a:after-x");
    assert_eq!(strip_all("a:hover"), "a:hover");
}

#[test]
fn test_argument_pseudos_are_kept() {
    assert_eq!(strip_all("li:pass(2)"), "li:pass(2)");
    assert_eq!(strip_all(r#"p:match("x"):deferred"#), r#"p:match("x")"#);
}

#[test]
fn test_quotes_and_escapes_are_untouched() {
    assert_eq!(strip_all(r#"[title=':after']"#), r#"[title=':after']"#);
    assert_eq!(strip_all(r#"[title="it's :before"]"#), r#"[title="it's :before"]"#);
    assert_eq!(strip_all(r"a\:before"), r"a\:before");
}

#[test]
fn test_empty_result() {
    assert_eq!(strip_all("::before"), "");
    assert_eq!(strip_all(":deferred:outside"), "");
}

#[quickcheck]
fn prop_stripping_is_idempotent(selector: String) -> bool {
    let once = strip_all(&selector);
    strip_all(&once) == once
}

#[quickcheck]
fn prop_text_without_colons_is_unchanged(selector: String) -> bool {
    selector.contains(':') || strip_all(&selector) == selector
}

#[quickcheck]
fn prop_quoted_text_is_preserved(body: String) -> bool {
    let body: String = body
        .chars()
        .filter(|c| !matches!(c, '"' | '\\'))
        .collect();
    let selector = format!(r#"[title="{body}"]"#);
    strip_all(&selector) == selector
}
