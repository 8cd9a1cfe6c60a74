//! Tests for DOM tree construction and traversal.

use selcov_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    tree.append_element(parent, ElementData::new(tag))
}

/// `<html><body><div><p>a</p><!--c--><p>b</p></div><span></span></body></html>`
fn sample_tree() -> (DomTree, [NodeId; 6]) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, NodeId::ROOT, "html");
    let body = alloc_element(&mut tree, html, "body");
    let div = alloc_element(&mut tree, body, "div");
    let p1 = alloc_element(&mut tree, div, "p");
    let _ = tree.append_text(p1, "a");
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(div, comment);
    let p2 = alloc_element(&mut tree, div, "p");
    let _ = tree.append_text(p2, "b");
    let span = alloc_element(&mut tree, body, "span");
    (tree, [html, body, div, p1, p2, span])
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert_eq!(tree.document_element(), None);
}

#[test]
fn test_append_child_links_siblings() {
    let (tree, [_, _, div, p1, p2, _]) = sample_tree();
    let children = tree.children(div);
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], p1);
    assert_eq!(children[2], p2);
    assert_eq!(tree.prev_sibling(p1), None);
    assert_eq!(tree.next_sibling(children[1]), Some(p2));
    assert_eq!(tree.prev_sibling(p2), Some(children[1]));
    assert_eq!(tree.parent(p2), Some(div));
}

#[test]
fn test_element_children_skip_comments() {
    let (tree, [_, _, div, p1, p2, _]) = sample_tree();
    let elements: Vec<_> = tree.element_children(div).collect();
    assert_eq!(elements, vec![p1, p2]);
}

#[test]
fn test_descendants_are_in_tree_order() {
    let (tree, [html, body, div, p1, p2, span]) = sample_tree();
    let elements: Vec<_> = tree.elements().collect();
    assert_eq!(elements, vec![html, body, div, p1, p2, span]);
}

#[test]
fn test_descendants_exclude_start_node() {
    let (tree, [_, _, div, p1, _, _]) = sample_tree();
    assert!(!tree.descendants(div).any(|id| id == div));
    assert!(tree.descendants(div).any(|id| id == p1));
}

#[test]
fn test_ancestors_walk_to_document() {
    let (tree, [html, body, div, p1, _, _]) = sample_tree();
    let ancestors: Vec<_> = tree.ancestors(p1).collect();
    assert_eq!(ancestors, vec![div, body, html, NodeId::ROOT]);
    assert!(tree.is_descendant_of(p1, html));
    assert!(!tree.is_descendant_of(html, p1));
}

#[test]
fn test_parent_element_stops_at_document() {
    let (tree, [html, body, _, _, _, _]) = sample_tree();
    assert_eq!(tree.parent_element(body), Some(html));
    assert_eq!(tree.parent_element(html), None);
}

#[test]
fn test_sibling_iterators() {
    let (tree, [_, _, div, p1, p2, span]) = sample_tree();
    let comment = tree.children(div)[1];
    let following: Vec<_> = tree.following_siblings(p1).collect();
    assert_eq!(following, vec![comment, p2]);
    let preceding: Vec<_> = tree.preceding_siblings(p2).collect();
    assert_eq!(preceding, vec![comment, p1]);
    assert_eq!(tree.following_siblings(span).count(), 0);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let (tree, [_, body, div, p1, _, _]) = sample_tree();
    assert_eq!(tree.text_content(p1), "a");
    assert_eq!(tree.text_content(div), "ab");
    assert_eq!(tree.text_content(body), "ab");
}

#[test]
fn test_element_data_accessors() {
    let element = ElementData::new("div")
        .with_attr("id", "main")
        .with_attr("class", "  one\ttwo  one ");
    assert_eq!(element.id(), Some("main"));
    assert!(element.has_attr("class"));
    assert!(!element.has_attr("title"));
    let classes = element.classes();
    assert_eq!(classes.len(), 2);
    assert!(classes.contains("one"));
    assert!(classes.contains("two"));
    assert!(element.is("DIV"));
}

#[test]
fn test_document_element_skips_doctype() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype("html".to_string()));
    tree.append_child(NodeId::ROOT, doctype);
    let html = alloc_element(&mut tree, NodeId::ROOT, "html");
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_insert_before_links_siblings() {
    let (mut tree, [_, body, div, _, _, span]) = sample_tree();
    let table = alloc_element(&mut tree, body, "table");
    let fostered = tree.alloc(NodeType::Element(ElementData::new("b")));
    tree.insert_before(body, fostered, table);

    assert_eq!(tree.children(body), &[div, span, fostered, table]);
    assert_eq!(tree.prev_sibling(fostered), Some(span));
    assert_eq!(tree.next_sibling(fostered), Some(table));
    assert_eq!(tree.next_sibling(span), Some(fostered));
    assert_eq!(tree.prev_sibling(table), Some(fostered));
    assert_eq!(tree.parent(fostered), Some(body));
}

#[test]
fn test_append_child_moves_attached_node() {
    let (mut tree, [_, body, div, p1, p2, span]) = sample_tree();
    tree.append_child(span, p1);

    assert_eq!(tree.parent(p1), Some(span));
    assert_eq!(tree.children(span), &[p1]);
    assert_eq!(tree.children(div).len(), 2);
    assert!(!tree.children(div).contains(&p1));
    assert_eq!(tree.prev_sibling(p1), None);
    assert_eq!(tree.next_sibling(p1), None);
    assert!(tree.is_descendant_of(p1, body));
    assert_eq!(tree.text_content(div), "b");
    assert_eq!(tree.element_children(div).collect::<Vec<_>>(), vec![p2]);
}

#[test]
fn test_detach_relinks_neighbours() {
    let (mut tree, [_, _, div, p1, p2, _]) = sample_tree();
    let comment = tree.children(div)[1];
    tree.detach(comment);

    assert_eq!(tree.children(div), &[p1, p2]);
    assert_eq!(tree.next_sibling(p1), Some(p2));
    assert_eq!(tree.prev_sibling(p2), Some(p1));
    assert_eq!(tree.parent(comment), None);

    // Detaching twice is harmless.
    tree.detach(comment);
    assert_eq!(tree.children(div), &[p1, p2]);
}

#[test]
fn test_move_children_keeps_order() {
    let (mut tree, [_, _, div, p1, p2, span]) = sample_tree();
    let comment = tree.children(div)[1];
    tree.move_children(div, span);

    assert!(tree.children(div).is_empty());
    assert_eq!(tree.children(span), &[p1, comment, p2]);
    assert_eq!(tree.prev_sibling(p2), Some(comment));
    assert_eq!(tree.parent(p2), Some(span));
}
