//! Selector matching against a [`DomTree`].
//!
//! Complex selectors are evaluated right to left from a candidate subject.
//! Each combinator step tries every element it could relate to, so a
//! failed match further left backtracks to the next candidate instead of
//! committing to the nearest one.

use std::borrow::Cow;

use selcov_dom::{DomTree, ElementData, NodeId, NodeType};

use super::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, Position, PseudoClass, RelativeSelector, SelectorList, SimpleSelector,
};
use crate::nth::Nth;

/// The element a relative selector is anchored to, and how its leftmost
/// compound must relate to it.
type Anchor = (Combinator, NodeId);

impl SelectorList {
    /// Every element matched by any alternative, in document order and
    /// without duplicates.
    #[must_use]
    pub fn select(&self, tree: &DomTree) -> Vec<NodeId> {
        let mut selected = vec![false; tree.len()];
        for selector in &self.selectors {
            for id in selector.select(tree) {
                selected[id.0] = true;
            }
        }
        tree.elements().filter(|id| selected[id.0]).collect()
    }

    /// Whether `node` is matched by any alternative.
    ///
    /// Alternatives ending in positional filters depend on the whole match
    /// set, so they are answered by running the selection.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|selector| {
            if selector.positions.is_empty() {
                selector.matches_element(tree, node)
            } else {
                selector.select(tree).contains(&node)
            }
        })
    }
}

impl ComplexSelector {
    /// The elements this selector matches in document order, after applying
    /// its positional filters.
    #[must_use]
    pub fn select(&self, tree: &DomTree) -> Vec<NodeId> {
        let mut matched: Vec<NodeId> = tree
            .elements()
            .filter(|&id| self.matches_element(tree, id))
            .collect();
        for &position in &self.positions {
            matched = apply_position(position, matched);
        }
        matched
    }

    /// Whether `node` matches this selector, ignoring positional filters.
    #[must_use]
    pub fn matches_element(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_anchored(tree, node, None)
    }

    fn matches_anchored(&self, tree: &DomTree, node: NodeId, anchor: Option<Anchor>) -> bool {
        compound_matches(&self.subject, tree, node)
            && matches_chain(&self.combinators, tree, node, anchor)
    }
}

impl CompoundSelector {
    /// Whether `node` is an element satisfying every simple selector.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        compound_matches(self, tree, node)
    }
}

fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node, element))
}

/// Walk the combinator chain leftwards from `node`.
///
/// When the chain is exhausted, the element reached must relate to the
/// anchor, if there is one.
fn matches_chain(
    chain: &[(Combinator, CompoundSelector)],
    tree: &DomTree,
    node: NodeId,
    anchor: Option<Anchor>,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return anchor.is_none_or(|(relation, scope)| related(relation, tree, scope, node));
    };
    let step = |candidate: NodeId| {
        compound_matches(compound, tree, candidate) && matches_chain(rest, tree, candidate, anchor)
    };

    match combinator {
        // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "an element B that is an arbitrary descendant of some ancestor element A"
        Combinator::Descendant => tree.ancestors(node).any(step),
        // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
        // "an element B that is a direct child of element A"
        Combinator::Child => tree.parent(node).is_some_and(step),
        // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
        // "an element B that immediately follows element A"
        Combinator::NextSibling => previous_element_sibling(tree, node).is_some_and(step),
        // [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
        // "an element B that follows element A (not necessarily immediately)"
        Combinator::SubsequentSibling => tree.preceding_siblings(node).any(step),
    }
}

/// Whether `node` stands in `relation` to `scope`, reading the relation as
/// `scope <relation> node`.
fn related(relation: Combinator, tree: &DomTree, scope: NodeId, node: NodeId) -> bool {
    match relation {
        Combinator::Descendant => tree.is_descendant_of(node, scope),
        Combinator::Child => tree.parent(node) == Some(scope),
        Combinator::NextSibling => previous_element_sibling(tree, node) == Some(scope),
        Combinator::SubsequentSibling => tree.preceding_siblings(node).any(|id| id == scope),
    }
}

fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node)
        .find(|&id| tree.as_element(id).is_some())
}

/// Apply one positional filter to an ordered match set.
fn apply_position(position: Position, matched: Vec<NodeId>) -> Vec<NodeId> {
    let len = i64::try_from(matched.len()).unwrap_or(i64::MAX);
    let resolve = |index: i64| if index < 0 { index.saturating_add(len) } else { index };

    match position {
        Position::First => matched.into_iter().take(1).collect(),
        Position::Last => matched.last().copied().into_iter().collect(),
        Position::Even => matched.into_iter().step_by(2).collect(),
        Position::Odd => matched.into_iter().skip(1).step_by(2).collect(),
        Position::Eq(index) => {
            let index = resolve(index);
            usize::try_from(index)
                .ok()
                .and_then(|i| matched.get(i).copied())
                .into_iter()
                .collect()
        }
        Position::Lt(index) => {
            let bound = resolve(index);
            filter_by_index(matched, |i| i < bound)
        }
        Position::Gt(index) => {
            let bound = resolve(index);
            filter_by_index(matched, |i| i > bound)
        }
    }
}

fn filter_by_index(matched: Vec<NodeId>, keep: impl Fn(i64) -> bool) -> Vec<NodeId> {
    matched
        .into_iter()
        .zip(0_i64..)
        .filter(|&(_, i)| keep(i))
        .map(|(id, _)| id)
        .collect()
}

// =============================================================================
// Simple selectors
// =============================================================================

fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match simple {
        // [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
        // HTML element names are ASCII case-insensitive.
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
        SimpleSelector::Universal => true,
        // [§ 6.6](https://www.w3.org/TR/selectors-4/#class-html)
        // "...represents an element belonging to the class identified by the identifier."
        SimpleSelector::Class(name) => element
            .attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == name)),
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
        SimpleSelector::Attribute(attribute) => attribute_matches(attribute, element),
        SimpleSelector::PseudoClass(pseudo) => pseudo_class_matches(pseudo, tree, node, element),
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    let Some(actual) = element.attr(&selector.name) else {
        return matches!(selector.value, Some((AttributeOperator::NotEquals, _)));
    };
    let Some((operator, expected)) = &selector.value else {
        return true;
    };

    let (actual, expected): (Cow<'_, str>, Cow<'_, str>) =
        if selector.case == CaseSensitivity::Insensitive {
            (
                Cow::Owned(actual.to_ascii_lowercase()),
                Cow::Owned(expected.to_ascii_lowercase()),
            )
        } else {
            (Cow::Borrowed(actual), Cow::Borrowed(expected.as_str()))
        };
    let (actual, expected) = (&*actual, &*expected);

    match operator {
        AttributeOperator::Equals => actual == expected,
        // "If "val" contains whitespace, it will never represent anything."
        AttributeOperator::Includes => {
            !expected.is_empty()
                && !expected.contains(|c: char| c.is_ascii_whitespace())
                && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // "If "val" is the empty string then the selector does not represent anything."
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttributeOperator::Substring => !expected.is_empty() && actual.contains(expected),
        AttributeOperator::NotEquals => actual != expected,
    }
}

// =============================================================================
// Pseudo-classes
// =============================================================================

fn pseudo_class_matches(
    pseudo: &PseudoClass,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match pseudo {
        PseudoClass::Root => tree.document_element() == Some(node),
        PseudoClass::Empty => is_empty(tree, node),
        PseudoClass::Parent => !is_empty(tree, node),

        PseudoClass::FirstChild => element_siblings_before(tree, node, None) == 0,
        PseudoClass::LastChild => element_siblings_after(tree, node, None) == 0,
        PseudoClass::OnlyChild => {
            element_siblings_before(tree, node, None) == 0
                && element_siblings_after(tree, node, None) == 0
        }
        PseudoClass::FirstOfType => element_siblings_before(tree, node, Some(element)) == 0,
        PseudoClass::LastOfType => element_siblings_after(tree, node, Some(element)) == 0,
        PseudoClass::OnlyOfType => {
            element_siblings_before(tree, node, Some(element)) == 0
                && element_siblings_after(tree, node, Some(element)) == 0
        }
        PseudoClass::NthChild(nth) => nth_matches(*nth, element_siblings_before(tree, node, None)),
        PseudoClass::NthLastChild(nth) => {
            nth_matches(*nth, element_siblings_after(tree, node, None))
        }
        PseudoClass::NthOfType(nth) => {
            nth_matches(*nth, element_siblings_before(tree, node, Some(element)))
        }
        PseudoClass::NthLastOfType(nth) => {
            nth_matches(*nth, element_siblings_after(tree, node, Some(element)))
        }

        PseudoClass::Not(list) => !list.matches(tree, node),
        PseudoClass::Is(list) => list.matches(tree, node),
        PseudoClass::Has(relative) => has_matches(relative, tree, node),

        PseudoClass::Contains(text) => tree.text_content(node).contains(text.as_str()),
        PseudoClass::Lang(lang) => lang_matches(lang, tree, node),

        // [§ 8.2](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo)
        // "a and area elements that have an href attribute"
        PseudoClass::Link => {
            (element.is("a") || element.is("area") || element.is("link"))
                && element.has_attr("href")
        }
        PseudoClass::Enabled => is_form_control(element) && !element.has_attr("disabled"),
        PseudoClass::Disabled => is_form_control(element) && element.has_attr("disabled"),
        PseudoClass::Checked => {
            (element.is("input")
                && matches!(&*input_type(element), "checkbox" | "radio")
                && element.has_attr("checked"))
                || (element.is("option") && element.has_attr("selected"))
        }
        PseudoClass::Selected => element.is("option") && element.has_attr("selected"),

        PseudoClass::Header => matches!(
            element.tag_name.as_str(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        ),
        PseudoClass::Input => matches!(
            element.tag_name.as_str(),
            "input" | "select" | "textarea" | "button"
        ),
        PseudoClass::Button => {
            element.is("button") || (element.is("input") && input_type(element) == "button")
        }
        PseudoClass::Text => element.is("input") && input_type(element) == "text",
        PseudoClass::InputType(kind) => element.is("input") && input_type(element) == *kind,
        PseudoClass::SubmitType(kind) => {
            (element.is("input") && input_type(element) == *kind)
                || (element.is("button") && button_type(element) == *kind)
        }

        PseudoClass::Dynamic(_) => false,
        PseudoClass::PassThrough(_) => true,
    }
}

/// `nth` is tested against the 1-based index for `preceding` earlier siblings.
fn nth_matches(nth: Nth, preceding: usize) -> bool {
    i64::try_from(preceding).is_ok_and(|count| nth.matches(count + 1))
}

/// Element siblings before `node`, counting only those with the same tag
/// as `of_type` when given.
fn element_siblings_before(tree: &DomTree, node: NodeId, of_type: Option<&ElementData>) -> usize {
    tree.preceding_siblings(node)
        .filter(|&id| same_kind(tree, id, of_type))
        .count()
}

fn element_siblings_after(tree: &DomTree, node: NodeId, of_type: Option<&ElementData>) -> usize {
    tree.following_siblings(node)
        .filter(|&id| same_kind(tree, id, of_type))
        .count()
}

fn same_kind(tree: &DomTree, id: NodeId, of_type: Option<&ElementData>) -> bool {
    tree.as_element(id).is_some_and(|sibling| {
        of_type.is_none_or(|element| sibling.tag_name.eq_ignore_ascii_case(&element.tag_name))
    })
}

/// No element children and no non-empty text; comments are ignored.
fn is_empty(tree: &DomTree, node: NodeId) -> bool {
    tree.children(node).iter().all(|&child| {
        tree.get(child).is_none_or(|n| match &n.node_type {
            NodeType::Element(_) => false,
            NodeType::Text(text) => text.is_empty(),
            NodeType::Document | NodeType::Doctype(_) | NodeType::Comment(_) => true,
        })
    })
}

/// [§ 7.2](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
///
/// The language comes from the nearest inclusive ancestor carrying `lang`.
fn lang_matches(lang: &str, tree: &DomTree, node: NodeId) -> bool {
    let declared = std::iter::once(node)
        .chain(tree.ancestors(node))
        .find_map(|id| tree.as_element(id).and_then(|e| e.attr("lang")));
    declared.is_some_and(|value| {
        let value = value.to_ascii_lowercase();
        value == lang
            || value
                .strip_prefix(lang)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

/// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
///
/// Candidates are drawn from where the leading combinator can reach: the
/// descendants of `scope`, or its following siblings and their descendants.
fn has_matches(relative: &[RelativeSelector], tree: &DomTree, scope: NodeId) -> bool {
    relative.iter().any(|rel| {
        let candidates: Vec<NodeId> = match rel.combinator {
            Combinator::Descendant | Combinator::Child => tree.descendants(scope).collect(),
            Combinator::NextSibling | Combinator::SubsequentSibling => tree
                .following_siblings(scope)
                .flat_map(|sibling| std::iter::once(sibling).chain(tree.descendants(sibling)))
                .collect(),
        };
        candidates.into_iter().any(|candidate| {
            rel.selector
                .matches_anchored(tree, candidate, Some((rel.combinator, scope)))
        })
    })
}

/// Elements whose `disabled` attribute means something.
fn is_form_control(element: &ElementData) -> bool {
    matches!(
        element.tag_name.as_str(),
        "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
    )
}

/// The `type` of an `input`, lowercase; missing means `text`.
fn input_type(element: &ElementData) -> Cow<'_, str> {
    element
        .attr("type")
        .map_or(Cow::Borrowed("text"), |t| Cow::Owned(t.to_ascii_lowercase()))
}

/// The `type` of a `button`, lowercase; missing means `submit`.
fn button_type(element: &ElementData) -> Cow<'_, str> {
    element
        .attr("type")
        .map_or(Cow::Borrowed("submit"), |t| Cow::Owned(t.to_ascii_lowercase()))
}
