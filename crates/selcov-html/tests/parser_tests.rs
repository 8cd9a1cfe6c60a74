//! Integration tests for the HTML tree builder.

use selcov_dom::{DomTree, NodeId, NodeType};
use selcov_html::{format_tree, parse_html};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_html(html).0
}

/// Helper to get element by tag name (first match, tree order)
fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.elements()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

/// Tag names of the element children of `id`
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.element_children(id)
        .filter_map(|c| tree.as_element(c).map(|e| e.tag_name.clone()))
        .collect()
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    let root_children = tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 2);
    assert!(matches!(
        &tree.get(root_children[0]).unwrap().node_type,
        NodeType::Doctype(name) if name == "html"
    ));
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
}

#[test]
fn test_implicit_structure_and_format() {
    let tree = parse("<!DOCTYPE html><title>T</title><p class=a>x");
    let expected = concat!(
        "#document\n",
        "  <!DOCTYPE html>\n",
        "  <html>\n",
        "    <head>\n",
        "      <title>\n",
        "        \"T\"\n",
        "    <body>\n",
        "      <p class=\"a\">\n",
        "        \"x\"\n",
    );
    assert_eq!(format_tree(&tree, NodeId::ROOT), expected);
}

#[test]
fn test_head_elements_stay_in_head() {
    let tree = parse("<title>x</title><link rel=a><style>p > a {}</style><div></div>");
    let head = find_element(&tree, "head");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, head), vec!["title", "link", "style"]);
    assert_eq!(child_tags(&tree, body), vec!["div"]);
    assert_eq!(tree.text_content(find_element(&tree, "style")), "p > a {}");
}

#[test]
fn test_void_elements() {
    let tree = parse("<p>a<br>b<img src=x>c</p>");
    let p = find_element(&tree, "p");
    assert_eq!(child_tags(&tree, p), vec!["br", "img"]);
    assert_eq!(tree.children(p).len(), 5);
    assert_eq!(tree.text_content(p), "abc");
}

#[test]
fn test_paragraphs_close_implicitly() {
    let tree = parse("<p>one<p>two<div>three</div>");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["p", "p", "div"]);
}

#[test]
fn test_list_items_close_implicitly() {
    let tree = parse("<ul><li>a<li>b</ul><dl><dt>x<dd>y<dt>z</dl>");
    assert_eq!(child_tags(&tree, find_element(&tree, "ul")), vec!["li", "li"]);
    assert_eq!(
        child_tags(&tree, find_element(&tree, "dl")),
        vec!["dt", "dd", "dt"]
    );
}

#[test]
fn test_headings_do_not_nest() {
    let tree = parse("<h1>a<h2>b");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["h1", "h2"]);
}

#[test]
fn test_table_gets_tbody_and_rows() {
    let tree = parse("<table><tr><td>1<td>2<tr><td>3</table><p>after");
    let table = find_element(&tree, "table");
    assert_eq!(child_tags(&tree, table), vec!["tbody"]);
    let tbody = find_element(&tree, "tbody");
    assert_eq!(child_tags(&tree, tbody), vec!["tr", "tr"]);
    let first_row = tree.element_children(tbody).next().unwrap();
    assert_eq!(child_tags(&tree, first_row), vec!["td", "td"]);
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["table", "p"]);
}

#[test]
fn test_cell_without_row() {
    let tree = parse("<table><td>x</td></table>");
    let tbody = find_element(&tree, "tbody");
    assert_eq!(child_tags(&tree, tbody), vec!["tr"]);
    assert_eq!(child_tags(&tree, find_element(&tree, "tr")), vec!["td"]);
}

#[test]
fn test_stray_p_end_tag_inserts_empty_p() {
    let (tree, issues) = parse_html("<div></p></div>");
    let div = find_element(&tree, "div");
    assert_eq!(child_tags(&tree, div), vec!["p"]);
    assert!(!issues.is_empty());
}

#[test]
fn test_end_tag_stops_at_special_element() {
    let (tree, issues) = parse_html("<span><div>x</span>y</div>");
    let div = find_element(&tree, "div");
    assert_eq!(tree.text_content(div), "xy");
    assert!(issues.iter().any(|i| i.message.contains("</span>")));
}

#[test]
fn test_block_end_tag_closes_inline_children() {
    let tree = parse("<div><span>a</div>b");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["div"]);
    assert_eq!(tree.as_text(tree.last_child(body).unwrap()), Some("b"));
}

#[test]
fn test_textarea_drops_leading_newline() {
    let tree = parse("<textarea>\nabc</textarea>");
    assert_eq!(tree.text_content(find_element(&tree, "textarea")), "abc");
}

#[test]
fn test_comments() {
    let tree = parse("<!-- c --><p>x</p></body><!-- d -->");
    assert!(matches!(
        &tree.get(tree.children(NodeId::ROOT)[0]).unwrap().node_type,
        NodeType::Comment(data) if data == " c "
    ));
    let html = tree.document_element().unwrap();
    let last = tree.last_child(html).unwrap();
    assert!(matches!(
        &tree.get(last).unwrap().node_type,
        NodeType::Comment(data) if data == " d "
    ));
}

#[test]
fn test_nested_anchor_becomes_sibling() {
    let tree = parse("<a href=1>x<a href=2>y");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["a", "a"]);
}

#[test]
fn test_options_close_each_other() {
    let tree = parse("<select><option>a<option>b</select><p>");
    let select = find_element(&tree, "select");
    assert_eq!(child_tags(&tree, select), vec!["option", "option"]);
    assert_eq!(child_tags(&tree, find_element(&tree, "body")), vec!["select", "p"]);
}

#[test]
fn test_self_closing_svg_children() {
    let tree = parse("<svg><circle/><rect/></svg>");
    assert_eq!(
        child_tags(&tree, find_element(&tree, "svg")),
        vec!["circle", "rect"]
    );
}

#[test]
fn test_repeated_body_merges_attributes() {
    let tree = parse("<body class=a><body id=b class=c>");
    let body = tree.as_element(find_element(&tree, "body")).unwrap();
    assert_eq!(body.attr("class"), Some("a"));
    assert_eq!(body.attr("id"), Some("b"));
}

/// Every element named `tag`, in tree order
fn find_all(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.elements()
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .collect()
}

#[test]
fn test_formatting_reopens_in_next_paragraph() {
    let tree = parse("<p><b>bold<p>more</b> tail");
    let paragraphs = find_all(&tree, "p");
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(child_tags(&tree, paragraphs[0]), vec!["b"]);
    assert_eq!(child_tags(&tree, paragraphs[1]), vec!["b"]);
    assert_eq!(tree.text_content(paragraphs[1]), "more tail");

    let bolds = find_all(&tree, "b");
    assert_eq!(bolds.len(), 2);
    assert_eq!(tree.text_content(bolds[1]), "more");
}

#[test]
fn test_misnested_formatting_end_tag_splits_at_block() {
    let (tree, issues) = parse_html("<b>1<p>2</b>3</p>");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["b", "p"]);

    let p = find_element(&tree, "p");
    assert_eq!(child_tags(&tree, p), vec!["b"]);
    assert_eq!(tree.text_content(p), "23");
    let inner_b = tree.element_children(p).next().unwrap();
    assert_eq!(tree.text_content(inner_b), "2");
    assert_eq!(tree.as_text(tree.last_child(p).unwrap()), Some("3"));
    assert!(issues.iter().any(|i| i.message.contains("</b>")));
}

#[test]
fn test_misnested_formatting_elements_are_recreated() {
    let tree = parse("<b>1<i>2<p>3</b>4</i>5</p>");
    let body = find_element(&tree, "body");
    // <b>1<i>2</i></b><i></i><p><i><b>3</b>4</i>5</p>
    assert_eq!(child_tags(&tree, body), vec!["b", "i", "p"]);
    let p = find_element(&tree, "p");
    assert_eq!(child_tags(&tree, p), vec!["i"]);
    let inner_i = tree.element_children(p).next().unwrap();
    assert_eq!(child_tags(&tree, inner_i), vec!["b"]);
    assert_eq!(tree.text_content(inner_i), "34");
    assert_eq!(tree.text_content(p), "345");
    assert_eq!(find_all(&tree, "b").len(), 2);
}

#[test]
fn test_formatting_keeps_attributes_when_recreated() {
    let tree = parse("<p><b class=x>a<p>b");
    let bolds = find_all(&tree, "b");
    assert_eq!(bolds.len(), 2);
    for b in bolds {
        assert_eq!(tree.as_element(b).unwrap().attr("class"), Some("x"));
    }
}

#[test]
fn test_identical_formatting_elements_limited_to_three() {
    let tree = parse("<p><b><b><b><b>x<p>y");
    let second_p = find_all(&tree, "p")[1];
    let reopened = tree
        .descendants(second_p)
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "b"))
        .count();
    assert_eq!(reopened, 3);
}

#[test]
fn test_nobr_inside_nobr() {
    let tree = parse("<nobr>a<nobr>b");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["nobr", "nobr"]);
}

#[test]
fn test_table_cell_scopes_formatting() {
    let tree = parse("<table><tr><td><b>x</td><td>y</td></tr></table>z");
    let cells = find_all(&tree, "td");
    assert_eq!(child_tags(&tree, cells[0]), vec!["b"]);
    assert!(child_tags(&tree, cells[1]).is_empty());
    assert_eq!(find_all(&tree, "b").len(), 1);
    let body = find_element(&tree, "body");
    assert_eq!(tree.as_text(tree.last_child(body).unwrap()), Some("z"));
}

#[test]
fn test_element_in_table_is_foster_parented() {
    let (tree, issues) = parse_html("<table><div class=x>d</div><tr><td>c</td></tr></table>");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["div", "table"]);
    assert_eq!(child_tags(&tree, find_element(&tree, "table")), vec!["tbody"]);
    assert_eq!(tree.text_content(find_element(&tree, "div")), "d");
    assert_eq!(tree.text_content(find_element(&tree, "td")), "c");
    assert!(issues.iter().any(|i| i.message.contains("<div>")));
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let tree = parse("<table>x<tr><td>c</td></tr>y</table>");
    let body = find_element(&tree, "body");
    let table = find_element(&tree, "table");
    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_text(children[0]), Some("xy"));
    assert_eq!(children[1], table);
    assert_eq!(tree.text_content(table), "c");
}

#[test]
fn test_whitespace_in_table_stays() {
    let tree = parse("<table> <tr><td>c</td></tr></table>");
    let table = find_element(&tree, "table");
    assert_eq!(tree.as_text(tree.children(table)[0]), Some(" "));
    assert_eq!(child_tags(&tree, find_element(&tree, "body")), vec!["table"]);
}

#[test]
fn test_hidden_input_stays_in_table() {
    let tree = parse("<table><input type=HIDDEN><input type=text></table>");
    let table = find_element(&tree, "table");
    assert_eq!(child_tags(&tree, table), vec!["input"]);
    assert_eq!(child_tags(&tree, find_element(&tree, "body")), vec!["input", "table"]);
}

#[test]
fn test_formatting_in_table_reopens_in_cell_content() {
    let tree = parse("<table><tr><b>x<td>c</td></tr></table>");
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["b", "table"]);
    assert_eq!(tree.text_content(find_element(&tree, "b")), "x");
    assert!(child_tags(&tree, find_element(&tree, "td")).is_empty());
}

#[test]
fn test_misnested_inline_and_table_document() {
    let tree = parse(
        "<p><b>bold<p>more</b> tail<table><div class=x>d</div><tr><td>c</td></tr></table>",
    );
    let body = find_element(&tree, "body");
    assert_eq!(child_tags(&tree, body), vec!["p", "p", "div", "table"]);
    assert_eq!(find_all(&tree, "b").len(), 2);
    let table = find_element(&tree, "table");
    let div = find_element(&tree, "div");
    assert!(!tree.is_descendant_of(div, table));
}
