//! Integration tests for selector matching against parsed documents.

use selcov_css::{EngineConfig, SelectorEngine};
use selcov_dom::{DomTree, NodeId};
use selcov_html::parse_html;

fn engine() -> SelectorEngine {
    SelectorEngine::new(
        EngineConfig::builder()
            .pass_through(["deferred", "pass", "match"])
            .build(),
    )
}

/// The `id` of each matched element, or its tag name when it has none.
fn labels(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| tree.as_element(id))
        .map(|e| e.id().unwrap_or(&e.tag_name).to_string())
        .collect()
}

fn select(html: &str, selector: &str) -> Vec<String> {
    let (tree, _) = parse_html(html);
    let matched = engine()
        .select(&tree, selector)
        .unwrap_or_else(|e| panic!("{selector:?} failed: {e}"));
    labels(&tree, &matched)
}

fn count(html: &str, selector: &str) -> usize {
    select(html, selector).len()
}

#[test]
fn test_class_and_type() {
    let html = r#"<div class="foo"></div><div class="bar"></div>"#;
    assert_eq!(count(html, "div.foo"), 1);
    assert_eq!(count(html, "DIV"), 2);
    assert_eq!(count(html, "span"), 0);
}

#[test]
fn test_results_are_in_document_order_without_duplicates() {
    let html = r#"<p id="one" class="x"></p><p id="two"></p>"#;
    assert_eq!(select(html, "#two, p, .x"), vec!["one", "two"]);
}

#[test]
fn test_descendant_combinator_backtracks() {
    // The nearest .b ancestor is not a child of .a, the outer one is.
    let html = r#"<div class="a"><div class="b"><div class="b"><span id="t"></span></div></div></div>"#;
    assert_eq!(select(html, ".a > .b span"), vec!["t"]);
}

#[test]
fn test_sibling_combinators() {
    let html = r#"<h2 id="h"></h2><p id="p1"></p><!-- x --><p id="p2"></p>"#;
    assert_eq!(select(html, "h2 + p"), vec!["p1"]);
    assert_eq!(select(html, "h2 ~ p"), vec!["p1", "p2"]);
    assert_eq!(select(html, "p + p"), vec!["p2"]);
}

#[test]
fn test_attribute_operators() {
    let html = r#"<a id="l1" href="https://x.org/a.PNG" lang="en-US" rel="nofollow noopener"></a><a id="l2" href="/b.png" title></a>"#;
    assert_eq!(select(html, "[href^=https]"), vec!["l1"]);
    assert_eq!(select(html, r#"[href$=".png"]"#), vec!["l2"]);
    assert_eq!(select(html, r#"[href$=".png" i]"#), vec!["l1", "l2"]);
    assert_eq!(select(html, r#"[href*="x.org"]"#), vec!["l1"]);
    assert_eq!(select(html, "[rel~=noopener]"), vec!["l1"]);
    assert_eq!(select(html, "[lang|=en]"), vec!["l1"]);
    assert_eq!(select(html, "a[title]"), vec!["l2"]);
    assert_eq!(select(html, "a[title!=x]"), vec!["l1", "l2"]);
}

#[test]
fn test_child_structural_pseudo_classes() {
    let html = r#"<ul><li id="a">1</li><li id="b">2</li><li id="c">3</li><li id="d">4</li></ul>"#;
    assert_eq!(select(html, "li:nth-child(2n+1)"), vec!["a", "c"]);
    assert_eq!(select(html, "li:nth-child(even)"), vec!["b", "d"]);
    assert_eq!(select(html, "li:nth-last-child(1)"), vec!["d"]);
    assert_eq!(select(html, "li:nth-child(-n+2)"), vec!["a", "b"]);
    assert_eq!(select(html, "li:first-child"), vec!["a"]);
    assert_eq!(select(html, "li:last-child"), vec!["d"]);
    assert_eq!(count(html, "li:only-child"), 0);
}

#[test]
fn test_type_structural_pseudo_classes() {
    let html = r#"<div><span id="s1"></span><em id="e1"></em><span id="s2"></span></div>"#;
    assert_eq!(select(html, "span:first-of-type"), vec!["s1"]);
    assert_eq!(select(html, "span:last-of-type"), vec!["s2"]);
    assert_eq!(select(html, "em:only-of-type"), vec!["e1"]);
    assert_eq!(select(html, "span:nth-of-type(2)"), vec!["s2"]);
    assert_eq!(select(html, "span:nth-last-of-type(2)"), vec!["s1"]);
}

#[test]
fn test_root_empty_and_parent() {
    let html = r#"<div id="e1"></div><div id="e2"><!-- c --></div><div id="f">t</div>"#;
    assert_eq!(select(html, ":root"), vec!["html"]);
    assert_eq!(select(html, "div:empty"), vec!["e1", "e2"]);
    assert_eq!(select(html, "div:parent"), vec!["f"]);
}

#[test]
fn test_logical_pseudo_classes() {
    let html = r#"<p id="a" class="x"></p><p id="b"></p>"#;
    assert_eq!(select(html, "p:not(.x)"), vec!["b"]);
    assert_eq!(select(html, ":is(#b, #a)"), vec!["a", "b"]);
    assert_eq!(select(html, "p:where(.x)"), vec!["a"]);
    assert_eq!(select(html, "p:matches(.x, #b)"), vec!["a", "b"]);
}

#[test]
fn test_has_relative_selectors() {
    let html = r#"<div id="d1"><p><a></a></p></div><div id="d2"><a></a></div><div id="d3"></div><span></span>"#;
    assert_eq!(select(html, "div:has(p a)"), vec!["d1"]);
    assert_eq!(select(html, "div:has(> a)"), vec!["d2"]);
    assert_eq!(select(html, "div:has(a)"), vec!["d1", "d2"]);
    assert_eq!(select(html, "div:has(+ span)"), vec!["d3"]);
    assert_eq!(select(html, "div:has(~ span)"), vec!["d1", "d2", "d3"]);
}

#[test]
fn test_content_pseudo_classes() {
    let html = r#"<html lang="en-GB"><body><p id="a">Hello world</p><p id="b" lang="fr">Bye</p></body></html>"#;
    assert_eq!(select(html, "p:contains(world)"), vec!["a"]);
    assert_eq!(select(html, r#"p:contains("Bye")"#), vec!["b"]);
    assert_eq!(select(html, "p:lang(en)"), vec!["a"]);
    assert_eq!(select(html, "p:lang(fr)"), vec!["b"]);
}

#[test]
fn test_form_pseudo_classes() {
    let html = concat!(
        r#"<form><input id="t"><input id="c" type="checkbox" checked>"#,
        r#"<input id="r" type="RADIO"><input id="d" disabled>"#,
        r#"<button id="b"></button><button id="rb" type="reset"></button>"#,
        r#"<select><option id="o" selected>x</option></select><textarea id="ta"></textarea></form>"#,
    );
    assert_eq!(select(html, ":text"), vec!["t", "d"]);
    assert_eq!(select(html, ":checkbox"), vec!["c"]);
    assert_eq!(select(html, ":radio"), vec!["r"]);
    assert_eq!(select(html, ":checked"), vec!["c", "o"]);
    assert_eq!(select(html, ":selected"), vec!["o"]);
    assert_eq!(select(html, ":disabled"), vec!["d"]);
    assert_eq!(select(html, "input:enabled"), vec!["t", "c", "r"]);
    assert_eq!(select(html, ":submit"), vec!["b"]);
    assert_eq!(select(html, ":reset"), vec!["rb"]);
    assert_eq!(select(html, ":button"), vec!["b", "rb"]);
    assert_eq!(count(html, ":input"), 8);
}

#[test]
fn test_links_headers_and_dynamic_states() {
    let html = r#"<h1 id="h"></h1><h7></h7><a id="l" href="/"></a><a id="n"></a>"#;
    assert_eq!(select(html, ":header"), vec!["h"]);
    assert_eq!(select(html, "a:link"), vec!["l"]);
    assert_eq!(select(html, "a:any-link"), vec!["l"]);
    assert_eq!(count(html, "a:hover"), 0);
    assert_eq!(count(html, "a:focus-within"), 0);
}

#[test]
fn test_positional_filters() {
    let html = r#"<ul><li id="a"></li><li id="b"></li><li id="c"></li><li id="d"></li></ul>"#;
    assert_eq!(select(html, "li:first"), vec!["a"]);
    assert_eq!(select(html, "li:last"), vec!["d"]);
    assert_eq!(select(html, "li:even"), vec!["a", "c"]);
    assert_eq!(select(html, "li:odd"), vec!["b", "d"]);
    assert_eq!(select(html, "li:eq(1)"), vec!["b"]);
    assert_eq!(select(html, "li:eq(-1)"), vec!["d"]);
    assert_eq!(select(html, "li:nth(2)"), vec!["c"]);
    assert_eq!(count(html, "li:eq(9)"), 0);
    assert_eq!(select(html, "li:lt(2)"), vec!["a", "b"]);
    assert_eq!(select(html, "li:gt(1)"), vec!["c", "d"]);
    assert_eq!(select(html, "li:gt(0):lt(2)"), vec!["b", "c"]);
    assert_eq!(select(html, "li:last, li:first"), vec!["a", "d"]);
}

#[test]
fn test_pass_through_never_narrows() {
    let html = r#"<a></a><p><a></a></p>"#;
    let plain = count(html, "a");
    assert_eq!(plain, 2);
    assert_eq!(count(html, "a:deferred"), plain);
    assert_eq!(count(html, "a::deferred"), plain);
    assert_eq!(count(html, "a:pass(2)"), plain);
    assert_eq!(count(html, r#"a:match("re")"#), plain);
    assert_eq!(count(html, "p a:deferred"), 1);
}

#[test]
fn test_selector_list_matches_single_element() {
    let (tree, _) = parse_html(r#"<ul><li class="x"></li><li></li></ul>"#);
    let engine = engine();
    let items = engine.select(&tree, "li").unwrap();
    assert_eq!(items.len(), 2);

    let list = engine.compile("li.x").unwrap();
    assert!(list.matches(&tree, items[0]));
    assert!(!list.matches(&tree, items[1]));

    let last = engine.compile("li:last").unwrap();
    assert!(!last.matches(&tree, items[0]));
    assert!(last.matches(&tree, items[1]));
}

#[test]
fn test_invalid_selector_is_an_error() {
    let (tree, _) = parse_html("<p></p>");
    assert!(engine().select(&tree, "p:bogus").is_err());
    assert!(engine().select(&tree, "p::after").is_err());
}
