use std::fmt::Write;

use strum_macros::Display;

use selcov_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// Table, select and frameset modes are not modelled as separate states.
/// Table parts and their implied end tags are handled from
/// [`InsertionMode::InBody`], which also routes content met while a table
/// section is the current node through foster parenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable tree construction problem. Parsing always continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description, e.g. `unexpected end tag </span>`.
    pub message: String,
    /// Index into the token stream where the problem was seen.
    pub token_index: usize,
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
}

impl Scope {
    fn is_barrier(self, tag: &str) -> bool {
        match self {
            Self::Default => DEFAULT_SCOPE_BARRIERS.contains(&tag),
            Self::ListItem => DEFAULT_SCOPE_BARRIERS.contains(&tag) || matches!(tag, "ol" | "ul"),
            Self::Button => DEFAULT_SCOPE_BARRIERS.contains(&tag) || tag == "button",
            Self::Table => matches!(tag, "html" | "table" | "template"),
        }
    }
}

const DEFAULT_SCOPE_BARRIERS: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.4.3 Formatting](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// Elements that put a marker on the list of active formatting elements when
/// they are inserted. Popping one clears the list up to that marker.
const MARKER_ELEMENTS: &[&str] = &["applet", "caption", "marquee", "object", "td", "th"];

/// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
///
/// "If foster parenting is enabled and target is a table, tbody, tfoot,
/// thead, or tr element"
const FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

/// Start tags the "in table" mode handles itself instead of foster parenting.
const TABLE_START_TAGS: &[&str] = &[
    "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "style",
    "script", "template",
];

/// End tags the "in table" mode handles itself instead of foster parenting.
const TABLE_END_TAGS: &[&str] = &[
    "body", "caption", "col", "colgroup", "html", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "template",
];

/// [§ 13.2.4.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
const SPECIAL_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
    "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "iframe", "img", "input", "keygen", "li", "link",
    "listing", "main", "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript",
    "object", "ol", "p", "param", "plaintext", "pre", "script", "search", "section",
    "select", "source", "style", "summary", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr", "xmp",
];

/// Start tags in body that close an open `p` and then insert a plain element.
const P_CLOSING_CONTAINERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main",
    "menu", "nav", "ol", "p", "search", "section", "summary", "ul",
];

/// End tags in body that close the matching element when it is in scope.
const SCOPED_BLOCK_END_TAGS: &[&str] = &[
    "address", "applet", "article", "aside", "blockquote", "button", "center", "details",
    "dialog", "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer", "form",
    "header", "hgroup", "listing", "main", "marquee", "menu", "nav", "object", "ol", "pre",
    "search", "section", "summary", "ul",
];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// A start tag kept on the list of active formatting elements, so the element
/// can be created again.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FormattingTag {
    name: String,
    attributes: Vec<Attribute>,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
#[derive(Debug, Clone)]
enum FormattingEntry {
    /// A formatting element and the token it was created for.
    Element { node: NodeId, tag: FormattingTag },
    /// "A marker is an entry in the list of active formatting elements that
    /// is distinct from any element."
    Marker,
}

impl FormattingEntry {
    const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Element { node, .. } => Some(*node),
            Self::Marker => None,
        }
    }

    const fn tag(&self) -> Option<&FormattingTag> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Marker => None,
        }
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from a token stream. Covers implicit `html`, `head`
/// and `body`, head-only elements, void elements, implied end tags, table
/// sections and rows, "any other end tag" recovery, the adoption agency
/// algorithm, reconstruction of active formatting elements and foster
/// parenting. Templates and foreign content are not implemented.
pub struct HTMLParser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    active_formatting_elements: Vec<FormattingEntry>,

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    foster_parenting: bool,

    /// Tree under construction; `NodeId::ROOT` is the Document.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    token_index: usize,

    /// Set when "stop parsing" runs.
    stopped: bool,

    /// A newline right after `<pre>`, `<listing>` or `<textarea>` is dropped.
    skip_next_newline: bool,

    /// Problems encountered so far.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            active_formatting_elements: Vec::new(),
            foster_parenting: false,
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            skip_next_newline: false,
            issues: Vec::new(),
        }
    }

    /// Parse issues recorded so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and the parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            if std::mem::take(&mut self.skip_next_newline)
                && matches!(token, Token::Character { data: '\n' })
            {
                self.token_index += 1;
                continue;
            }
            self.process_token(&token);
            self.token_index += 1;
        }
        (self.tree, self.issues)
    }

    fn parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }

    fn process_token(&mut self, token: &Token) {
        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
        }
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    const fn is_whitespace_token(token: &Token) -> bool {
        matches!(
            token,
            Token::Character {
                data: '\t' | '\n' | '\x0C' | '\r' | ' '
            }
        )
    }
}

// =============================================================================
// Stack and Insertion Helpers
// =============================================================================

impl HTMLParser {
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn tag_name(&self, id: NodeId) -> &str {
        self.tree.as_element(id).map_or("", |e| e.tag_name.as_str())
    }

    fn current_node_is(&self, names: &[&str]) -> bool {
        names.contains(&self.tag_name(self.current_node()))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    fn has_any_element_in_scope(&self, targets: &[&str], scope: Scope) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let tag = self.tag_name(id);
            if targets.contains(&tag) {
                return true;
            }
            if scope.is_barrier(tag) {
                return false;
            }
        }
        false
    }

    fn has_element_in_scope(&self, target: &str, scope: Scope) -> bool {
        self.has_any_element_in_scope(&[target], scope)
    }

    fn has_node_in_scope(&self, target: NodeId, scope: Scope) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            if id == target {
                return true;
            }
            if scope.is_barrier(self.tag_name(id)) {
                return false;
            }
        }
        false
    }

    fn stack_position(&self, target: NodeId) -> Option<usize> {
        self.stack_of_open_elements
            .iter()
            .position(|&id| id == target)
    }

    /// Pop the current node. Popping a cell, caption, `applet`, `marquee` or
    /// `object` also clears the active formatting elements up to the last
    /// marker.
    fn pop_current(&mut self) -> Option<NodeId> {
        let id = self.stack_of_open_elements.pop()?;
        if MARKER_ELEMENTS.contains(&self.tag_name(id)) {
            self.clear_active_formatting_elements_to_last_marker();
        }
        Some(id)
    }

    /// Pop elements until one named in `names` has been popped.
    fn pop_until(&mut self, names: &[&str]) {
        while let Some(id) = self.pop_current() {
            if names.contains(&self.tag_name(id)) {
                break;
            }
        }
    }

    /// Pop until the current node is one of `names` (or `html`), leaving it open.
    fn clear_stack_back_to(&mut self, names: &[&str]) {
        while !self.current_node_is(names) && !self.current_node_is(&["html"]) {
            if self.pop_current().is_none() {
                break;
            }
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        loop {
            let tag = self.tag_name(self.current_node());
            if !IMPLIED_END_TAGS.contains(&tag) || exclude == Some(tag) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// Returns the parent and, when the node goes before an existing child,
    /// that child.
    fn insertion_location(&self) -> (NodeId, Option<NodeId>) {
        let target = self.current_node();
        if self.foster_parenting && FOSTER_TARGETS.contains(&self.tag_name(target)) {
            return self.foster_parent_location();
        }
        (target, None)
    }

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        // STEP 1: "Let last table be the last table element in the stack of
        //          open elements, if any."
        let Some(table_index) = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.tag_name(id) == "table")
        else {
            // STEP 3: "...inside the first element in the stack of open
            //          elements (the html element)."
            let html = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            return (html, None);
        };
        let table = self.stack_of_open_elements[table_index];

        // STEP 2: "If last table has a parent node, then let adjusted
        //          insertion location be inside last table's parent node,
        //          immediately before last table."
        if let Some(parent) = self.tree.parent(table) {
            return (parent, Some(table));
        }
        let above = table_index
            .checked_sub(1)
            .and_then(|i| self.stack_of_open_elements.get(i))
            .copied()
            .unwrap_or(NodeId::ROOT);
        (above, None)
    }

    fn place_node(&mut self, (parent, before): (NodeId, Option<NodeId>), id: NodeId) {
        match before {
            Some(reference) => self.tree.insert_before(parent, id, reference),
            None => self.tree.append_child(parent, id),
        }
    }

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// The element is allocated but not inserted. Repeated attributes keep
    /// their first value.
    fn create_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let mut attrs = AttributesMap::with_capacity(attributes.len());
        for attr in attributes {
            let _ = attrs
                .entry(attr.name.clone())
                .or_insert_with(|| attr.value.clone());
        }
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    fn insert_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let id = self.create_element(name, attributes);
        let location = self.insertion_location();
        self.place_node(location, id);
        self.stack_of_open_elements.push(id);
        id
    }

    /// Insert an element that is immediately popped (void elements and
    /// self-closing foreign elements).
    fn insert_void_element(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_element(name, attributes);
        let _ = self.stack_of_open_elements.pop();
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let location = self.insertion_location();
        let (parent, before) = location;
        if parent == NodeId::ROOT {
            return;
        }
        let previous = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }
        let id = self.tree.alloc(NodeType::Text(c.to_string()));
        self.place_node(location, id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment_into(&mut self, parent: NodeId, data: &str) {
        let id = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, id);
    }

    fn insert_comment(&mut self, data: &str) {
        let parent = self.current_node();
        self.insert_comment_into(parent, data);
    }

    /// Add attributes from a repeated `<html>` or `<body>` start tag that the
    /// element does not already have.
    fn merge_attributes(&mut self, id: NodeId, attributes: &[Attribute]) {
        if let Some(node) = self.tree.get_mut(id)
            && let NodeType::Element(data) = &mut node.node_type
        {
            for attr in attributes {
                let _ = data
                    .attrs
                    .entry(attr.name.clone())
                    .or_insert_with(|| attr.value.clone());
            }
        }
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "Let the original insertion mode be the current insertion mode. Then,
    /// switch the insertion mode to "text"."
    fn insert_raw_text_element(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_element(name, attributes);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is(&["p"]) {
            self.parse_error("unclosed elements inside <p>");
        }
        self.pop_until(&["p"]);
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    fn close_p_in_button_scope(&mut self) {
        if self.has_element_in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// The `li`, `dd` and `dt` start tag steps: close the nearest open item
    /// of the same kind unless a special element other than `address`, `div`
    /// or `p` comes first.
    fn close_list_item(&mut self, kinds: &[&str]) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let tag = self.tag_name(self.stack_of_open_elements[index]);
            if kinds.contains(&tag) {
                let tag = tag.to_string();
                self.generate_implied_end_tags(Some(&tag));
                if !self.current_node_is(&[tag.as_str()]) {
                    self.parse_error(&format!("unclosed elements inside <{tag}>"));
                }
                self.pop_until(&[tag.as_str()]);
                return;
            }
            if SPECIAL_ELEMENTS.contains(&tag) && !matches!(tag, "address" | "div" | "p") {
                return;
            }
        }
    }

    /// Close the element named `name` if it is in `scope`, popping anything
    /// opened inside it.
    fn close_scoped_element(&mut self, name: &str, scope: Scope) {
        if !self.has_element_in_scope(name, scope) {
            self.parse_error(&format!("unexpected end tag </{name}>"));
            return;
        }
        self.generate_implied_end_tags(Some(name));
        if !self.current_node_is(&[name]) {
            self.parse_error(&format!("unclosed elements inside <{name}>"));
        }
        self.pop_until(&[name]);
    }

    fn inside_foreign_element(&self) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| matches!(self.tag_name(id), "svg" | "math"))
    }
}

// =============================================================================
// Insertion Modes
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => {}
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            Token::Doctype { name, .. } => {
                let id = self
                    .tree
                    .alloc(NodeType::Doctype(name.clone().unwrap_or_default()));
                self.tree.append_child(NodeId::ROOT, id);
                self.insertion_mode = InsertionMode::BeforeHtml;
            }
            _ => {
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => {}
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let _ = self.insert_element("html", attributes);
                self.insertion_mode = InsertionMode::BeforeHead;
            }
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(&format!("unexpected end tag </{name}>"));
            }
            _ => {
                let _ = self.insert_element("html", &[]);
                self.insertion_mode = InsertionMode::BeforeHead;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => {}
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                self.head_element_pointer = Some(self.insert_element("head", attributes));
                self.insertion_mode = InsertionMode::InHead;
            }
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error(&format!("unexpected end tag </{name}>"));
            }
            _ => {
                self.head_element_pointer = Some(self.insert_element("head", &[]));
                self.insertion_mode = InsertionMode::InHead;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace_token(token) => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    self.insert_void_element(name, attributes);
                }
                "title" | "noframes" | "style" | "noscript" | "script" => {
                    self.insert_raw_text_element(name, attributes);
                }
                "head" => self.parse_error("unexpected <head>"),
                _ => self.leave_head(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "head" => {
                    let _ = self.stack_of_open_elements.pop();
                    self.insertion_mode = InsertionMode::AfterHead;
                }
                "body" | "html" | "br" => self.leave_head(token),
                _ => self.parse_error(&format!("unexpected end tag </{name}>")),
            },
            _ => self.leave_head(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn leave_head(&mut self, token: &Token) {
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::AfterHead;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace_token(token) => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),
                "body" => {
                    let _ = self.insert_element("body", attributes);
                    self.insertion_mode = InsertionMode::InBody;
                }
                // "Push the node pointed to by the head element pointer onto
                // the stack of open elements. Process the token using the rules
                // for the "in head" insertion mode. Remove the node pointed to
                // by the head element pointer from the stack of open elements."
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "title" => {
                    self.parse_error(&format!("<{name}> after </head>"));
                    if let Some(head) = self.head_element_pointer {
                        self.stack_of_open_elements.push(head);
                        self.handle_in_head_mode(token);
                        self.stack_of_open_elements.retain(|&id| id != head);
                    }
                }
                "head" => self.parse_error("unexpected <head>"),
                _ => self.enter_body(token),
            },
            Token::EndTag { name, .. } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error(&format!("unexpected end tag </{name}>"));
            }
            _ => self.enter_body(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn enter_body(&mut self, token: &Token) {
        let _ = self.insert_element("body", &[]);
        self.insertion_mode = InsertionMode::InBody;
        self.process_token(token);
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_in_body_mode(&mut self, token: &Token) {
        if !self.foster_parenting && self.current_node_is(FOSTER_TARGETS) {
            self.handle_in_table_content(token);
        } else {
            self.in_body_token(token);
        }
    }

    fn in_body_token(&mut self, token: &Token) {
        match token {
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, *self_closing, attributes),
            Token::EndTag { name, .. } => self.in_body_end_tag(token, name),
            // "Stop parsing."
            Token::EndOfFile => self.stopped = true,
        }
    }

    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) {
        match name {
            "html" => {
                self.parse_error("unexpected <html>");
                if let Some(&html) = self.stack_of_open_elements.first() {
                    self.merge_attributes(html, attributes);
                }
            }
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "title" => self.handle_in_head_mode(token),
            "body" => {
                self.parse_error("unexpected <body>");
                if let Some(&body) = self.stack_of_open_elements.get(1)
                    && self.tag_name(body) == "body"
                {
                    self.merge_attributes(body, attributes);
                }
            }
            _ if P_CLOSING_CONTAINERS.contains(&name) => {
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
            }
            _ if HEADINGS.contains(&name) => {
                self.close_p_in_button_scope();
                if self.current_node_is(HEADINGS) {
                    self.parse_error(&format!("<{name}> inside another heading"));
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_element(name, attributes);
            }
            "pre" | "listing" => {
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
                self.skip_next_newline = true;
            }
            "form" | "plaintext" => {
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
            }
            "li" => {
                self.close_list_item(&["li"]);
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
            }
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
            }
            "button" => {
                if self.has_element_in_scope("button", Scope::Default) {
                    self.parse_error("nested <button>");
                    self.generate_implied_end_tags(None);
                    self.pop_until(&["button"]);
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
            }
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list..."
                if let Some(index) = self.formatting_element_after_marker("a") {
                    self.parse_error("nested <a>");
                    let existing = self.active_formatting_elements[index].node();
                    self.run_adoption_agency("a");
                    if let Some(existing) = existing {
                        if let Some(position) = self.formatting_position(existing) {
                            let _ = self.active_formatting_elements.remove(position);
                        }
                        self.stack_of_open_elements.retain(|&id| id != existing);
                    }
                }
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes);
            }
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr", Scope::Default) {
                    self.parse_error("nested <nobr>");
                    self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element(name, attributes);
            }
            _ if FORMATTING_ELEMENTS.contains(&name) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes);
            }
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
                self.active_formatting_elements.push(FormattingEntry::Marker);
            }
            "table" => {
                if self.has_element_in_scope("table", Scope::Table)
                    && !self.has_any_element_in_scope(&["td", "th", "caption"], Scope::Table)
                {
                    // "act as if an end tag token with the tag name "table"
                    // had been seen, then, if that token wasn't ignored,
                    // reprocess the current token."
                    self.parse_error("<table> directly inside <table>");
                    self.pop_until(&["table"]);
                    self.process_token(token);
                    return;
                }
                self.close_p_in_button_scope();
                let _ = self.insert_element(name, attributes);
            }
            "hr" => {
                self.close_p_in_button_scope();
                self.insert_void_element(name, attributes);
            }
            // "Parse error. Change the token's tag name to "img" and reprocess it."
            "image" => {
                self.parse_error("<image> treated as <img>");
                self.reconstruct_active_formatting_elements();
                self.insert_void_element("img", attributes);
            }
            "textarea" => {
                self.insert_raw_text_element(name, attributes);
                self.skip_next_newline = true;
            }
            "xmp" => {
                self.close_p_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.insert_raw_text_element(name, attributes);
            }
            "iframe" | "noembed" | "noscript" => self.insert_raw_text_element(name, attributes),
            "optgroup" => {
                if self.current_node_is(&["option"]) {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self.current_node_is(&["optgroup"]) {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
            }
            "option" => {
                if self.current_node_is(&["option"]) {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element(name, attributes);
            }
            "caption" | "colgroup" | "col" | "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" => {
                self.table_part_start_tag(name, attributes);
            }
            "frame" | "frameset" | "head" => {
                self.parse_error(&format!("unexpected <{name}> in body"));
            }
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" | "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(name, attributes);
            }
            _ if VOID_ELEMENTS.contains(&name) => self.insert_void_element(name, attributes),
            _ => {
                self.reconstruct_active_formatting_elements();
                if self_closing && self.inside_foreign_element() {
                    self.insert_void_element(name, attributes);
                } else {
                    let _ = self.insert_element(name, attributes);
                }
            }
        }
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) {
        match name {
            "body" => {
                if self.has_element_in_scope("body", Scope::Default) {
                    self.insertion_mode = InsertionMode::AfterBody;
                } else {
                    self.parse_error("unexpected end tag </body>");
                }
            }
            "html" => {
                if self.has_element_in_scope("body", Scope::Default) {
                    self.insertion_mode = InsertionMode::AfterBody;
                    self.process_token(token);
                } else {
                    self.parse_error("unexpected end tag </html>");
                }
            }
            // "If the stack of open elements does not have a p element in
            // button scope, then this is a parse error; insert an HTML element
            // for a "p" start tag token with no attributes."
            "p" => {
                if !self.has_element_in_scope("p", Scope::Button) {
                    self.parse_error("end tag </p> without open <p>");
                    let _ = self.insert_element("p", &[]);
                }
                self.close_p_element();
            }
            "li" => self.close_scoped_element(name, Scope::ListItem),
            "dd" | "dt" => self.close_scoped_element(name, Scope::Default),
            _ if SCOPED_BLOCK_END_TAGS.contains(&name) => {
                self.close_scoped_element(name, Scope::Default);
            }
            _ if HEADINGS.contains(&name) => {
                if self.has_any_element_in_scope(HEADINGS, Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is(&[name]) {
                        self.parse_error(&format!("mismatched heading end tag </{name}>"));
                    }
                    self.pop_until(HEADINGS);
                } else {
                    self.parse_error(&format!("unexpected end tag </{name}>"));
                }
            }
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br"
            // start tag token with no attributes"
            "br" => {
                self.parse_error("end tag </br> treated as <br>");
                self.reconstruct_active_formatting_elements();
                self.insert_void_element("br", &[]);
            }
            "table" | "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" | "caption" | "colgroup" => {
                self.table_part_end_tag(name);
            }
            _ if FORMATTING_ELEMENTS.contains(&name) => self.run_adoption_agency(name),
            _ => self.any_other_end_tag(name),
        }
    }

    /// [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Walk down from the current node; close the first element with the same
    /// tag name, unless a special element is reached first.
    fn any_other_end_tag(&mut self, name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let tag = self.tag_name(self.stack_of_open_elements[index]);
            if tag == name {
                self.generate_implied_end_tags(Some(name));
                if self.stack_of_open_elements.len() != index + 1 {
                    self.parse_error(&format!("unclosed elements inside <{name}>"));
                }
                self.stack_of_open_elements.truncate(index);
                return;
            }
            if SPECIAL_ELEMENTS.contains(&tag) {
                self.parse_error(&format!("unexpected end tag </{name}>"));
                return;
            }
        }
    }

    /// Table section, row and cell start tags. Missing `tbody`, `tr` and
    /// `colgroup` wrappers are inserted the way the "in table" and "in table
    /// body" modes do.
    fn table_part_start_tag(&mut self, name: &str, attributes: &[Attribute]) {
        if !self.has_element_in_scope("table", Scope::Table) {
            self.parse_error(&format!("<{name}> outside of a table"));
            return;
        }
        match name {
            "col" => {
                self.clear_stack_back_to(&["table", "colgroup"]);
                if !self.current_node_is(&["colgroup"]) {
                    let _ = self.insert_element("colgroup", &[]);
                }
                self.insert_void_element(name, attributes);
            }
            "tr" => {
                self.clear_stack_back_to(&["table", "tbody", "thead", "tfoot"]);
                if self.current_node_is(&["table"]) {
                    let _ = self.insert_element("tbody", &[]);
                }
                let _ = self.insert_element(name, attributes);
            }
            "td" | "th" => {
                self.clear_stack_back_to(&["table", "tbody", "thead", "tfoot", "tr"]);
                if self.current_node_is(&["table"]) {
                    let _ = self.insert_element("tbody", &[]);
                }
                if !self.current_node_is(&["tr"]) {
                    let _ = self.insert_element("tr", &[]);
                }
                let _ = self.insert_element(name, attributes);
                self.active_formatting_elements.push(FormattingEntry::Marker);
            }
            _ => {
                self.clear_stack_back_to(&["table"]);
                let _ = self.insert_element(name, attributes);
                if name == "caption" {
                    self.active_formatting_elements.push(FormattingEntry::Marker);
                }
            }
        }
    }

    fn table_part_end_tag(&mut self, name: &str) {
        if !self.has_element_in_scope(name, Scope::Table) {
            self.parse_error(&format!("unexpected end tag </{name}>"));
            return;
        }
        if matches!(name, "td" | "th" | "caption") {
            self.generate_implied_end_tags(None);
        }
        self.pop_until(&[name]);
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    ///
    /// Tokens seen while a table, section or row is the current node. Table
    /// structure is handled by the "in body" rules; anything else is
    /// processed with foster parenting enabled.
    fn handle_in_table_content(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.handle_table_text(*data),
            Token::StartTag {
                name, attributes, ..
            } if name == "input" && is_hidden_input(attributes) => {
                self.parse_error("hidden <input> inside a table");
                self.insert_void_element(name, attributes);
            }
            // "Insert an HTML element for the token... Pop that form element
            // off the stack of open elements."
            Token::StartTag {
                name, attributes, ..
            } if name == "form" => {
                self.parse_error("<form> inside a table");
                self.insert_void_element(name, attributes);
            }
            Token::StartTag { name, .. } if !TABLE_START_TAGS.contains(&name.as_str()) => {
                self.parse_error(&format!("<{name}> inside a table"));
                self.in_body_fostered(token);
            }
            Token::EndTag { name, .. } if !TABLE_END_TAGS.contains(&name.as_str()) => {
                self.parse_error(&format!("end tag </{name}> inside a table"));
                self.in_body_fostered(token);
            }
            _ => self.in_body_token(token),
        }
    }

    /// "Process the token using the rules for the "in body" insertion mode,
    /// except that whenever a node would be inserted into the current node
    /// when the current node is a table, tbody, tfoot, thead, or tr element,
    /// then it must instead be foster parented."
    fn in_body_fostered(&mut self, token: &Token) {
        self.foster_parenting = true;
        self.in_body_token(token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    ///
    /// Takes the whole run of character tokens starting at the current one.
    /// A run of whitespace stays in the table; any other run is foster
    /// parented as a single text node.
    fn handle_table_text(&mut self, first: char) {
        let mut run = String::new();
        if matches!(
            self.tokens.get(self.token_index),
            Some(Token::Character { .. })
        ) {
            let end = self.tokens[self.token_index..]
                .iter()
                .position(|token| !matches!(token, Token::Character { .. }))
                .map_or(self.tokens.len(), |offset| self.token_index + offset);
            run.extend(self.tokens[self.token_index..end].iter().filter_map(
                |token| match token {
                    Token::Character { data } => Some(*data),
                    _ => None,
                },
            ));
            self.token_index = end - 1;
        } else {
            run.push(first);
        }

        if run.chars().all(|c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')) {
            for c in run.chars() {
                self.insert_character(c);
            }
            return;
        }
        self.parse_error("text inside a table");
        self.foster_parenting = true;
        self.reconstruct_active_formatting_elements();
        for c in run.chars() {
            self.insert_character(c);
        }
        self.foster_parenting = false;
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    fn insert_formatting_element(&mut self, name: &str, attributes: &[Attribute]) {
        let node = self.insert_element(name, attributes);
        let tag = FormattingTag {
            name: name.to_string(),
            attributes: attributes.to_vec(),
        };

        // "If there are already three elements in the list of active
        // formatting elements after the last marker, if any, or anywhere in
        // the list if there are no markers, that have the same tag name,
        // namespace, and attributes as element, then remove the earliest
        // such element from the list of active formatting elements."
        let mut matching = Vec::new();
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry.tag() {
                None => break,
                Some(existing) if same_formatting_tag(existing, &tag) => matching.push(index),
                Some(_) => {}
            }
        }
        if matching.len() >= 3
            && let Some(&earliest) = matching.last()
        {
            let _ = self.active_formatting_elements.remove(earliest);
        }

        self.active_formatting_elements
            .push(FormattingEntry::Element { node, tag });
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    fn formatting_position(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .position(|entry| entry.node() == Some(node))
    }

    /// The last entry named `name` between the end of the list and the last
    /// marker.
    fn formatting_element_after_marker(&self, name: &str) -> Option<usize> {
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry.tag() {
                None => return None,
                Some(tag) if tag.name == name => return Some(index),
                Some(_) => {}
            }
        }
        None
    }

    fn is_open_or_marker(&self, entry: &FormattingEntry) -> bool {
        entry
            .node()
            .is_none_or(|node| self.stack_of_open_elements.contains(&node))
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1-2: "If there are no entries... If the last (most recently
        //            added) entry... is a marker, or if it is an element that
        //            is in the stack of open elements, then there is nothing
        //            to reconstruct"
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        if self.is_open_or_marker(last) {
            return;
        }

        // STEP 4-6: Rewind to the entry after the last marker or open element.
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 && !self.is_open_or_marker(&self.active_formatting_elements[index - 1]) {
            index -= 1;
        }

        // STEP 7-10: Advance, creating each element again and replacing its
        //            entry.
        for entry_index in index..self.active_formatting_elements.len() {
            let Some(tag) = self.active_formatting_elements[entry_index].tag().cloned() else {
                continue;
            };
            let node = self.insert_element(&tag.name, &tag.attributes);
            self.active_formatting_elements[entry_index] = FormattingEntry::Element { node, tag };
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Run for an end tag named `subject` that closes a formatting element.
    /// Elements opened inside the formatting element are moved so that the
    /// formatting applies to the content the markup intended.
    fn run_adoption_agency(&mut self, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the
        //          stack of open elements and return."
        let current = self.current_node();
        if self.tag_name(current) == subject && self.formatting_position(current).is_none() {
            let _ = self.stack_of_open_elements.pop();
            return;
        }

        // STEP 3-5: Outer loop, at most eight times.
        for _ in 0..8 {
            // STEP 6: "Let formatting element be the last element in the list
            //          of active formatting elements that is between the end
            //          of the list and the last marker in the list, if any,
            //          or the start of the list otherwise, and has the tag
            //          name subject."
            let Some(formatting_index) = self.formatting_element_after_marker(subject) else {
                // "If there is no such element, then return and instead act as
                //  described in the "any other end tag" entry above."
                self.any_other_end_tag(subject);
                return;
            };
            let FormattingEntry::Element {
                node: formatting_element,
                tag: formatting_tag,
            } = self.active_formatting_elements[formatting_index].clone()
            else {
                return;
            };

            // STEP 7: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the
            //          element from the list, and return."
            let Some(formatting_stack_index) = self.stack_position(formatting_element) else {
                self.parse_error(&format!("end tag </{subject}> for a closed element"));
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };

            // STEP 8: "If formatting element is in the stack of open elements,
            //          but the element is not in scope, then this is a parse
            //          error; return."
            if !self.has_node_in_scope(formatting_element, Scope::Default) {
                self.parse_error(&format!("end tag </{subject}> out of scope"));
                return;
            }

            // STEP 9: "If formatting element is not the current node, this is
            //          a parse error."
            if formatting_element != self.current_node() {
                self.parse_error(&format!("misnested end tag </{subject}>"));
            }

            // STEP 10: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than
            //           formatting element, and is an element in the special
            //           category."
            let furthest_block_index = self.stack_of_open_elements
                [formatting_stack_index + 1..]
                .iter()
                .position(|&id| SPECIAL_ELEMENTS.contains(&self.tag_name(id)))
                .map(|offset| formatting_stack_index + 1 + offset);

            // STEP 11: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element
            //           from the list of active formatting elements, and
            //           finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // STEP 12: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let Some(&common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .and_then(|index| self.stack_of_open_elements.get(index))
            else {
                return;
            };

            // STEP 13: "Let a bookmark note the position of formatting element
            //           in the list of active formatting elements"
            let mut bookmark = formatting_index;

            // STEP 14: Inner loop.
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 14.3: "Let node be the element immediately above node
                //             in the stack of open elements"
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 14.4: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 14.5: "If inner loop counter is greater than three and
                //             node is in the list of active formatting
                //             elements, then remove node from the list"
                let mut entry_index = self.formatting_position(node);
                if inner_loop_counter > 3
                    && let Some(index) = entry_index
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                    entry_index = None;
                }

                // STEP 14.6: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of
                //             open elements and continue."
                let Some(entry_index) = entry_index else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 14.7: "Create an element for the token for which the
                //             element node was created... replace the entry
                //             for node in the list of active formatting
                //             elements with an entry for the new element,
                //             replace the entry for node in the stack of open
                //             elements with an entry for the new element, and
                //             let node be the new element."
                let Some(tag) = self.active_formatting_elements[entry_index].tag().cloned() else {
                    continue;
                };
                let new_node = self.create_element(&tag.name, &tag.attributes);
                self.active_formatting_elements[entry_index] = FormattingEntry::Element {
                    node: new_node,
                    tag,
                };
                self.stack_of_open_elements[node_index] = new_node;

                // STEP 14.8: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after
                //             the new node in the list"
                if last_node == furthest_block {
                    bookmark = entry_index + 1;
                }

                // STEP 14.9: "Append last node to node."
                self.tree.append_child(new_node, last_node);

                // STEP 14.10
                last_node = new_node;
            }

            // STEP 15: "Insert whatever last node ended up being in the
            //           previous step at the appropriate place for inserting a
            //           node, but using common ancestor as the override
            //           target."
            let location = if self.foster_parenting
                && FOSTER_TARGETS.contains(&self.tag_name(common_ancestor))
            {
                self.foster_parent_location()
            } else {
                (common_ancestor, None)
            };
            self.place_node(location, last_node);

            // STEP 16-18: "Create an element for the token for which
            //              formatting element was created... Take all of the
            //              child nodes of furthest block and append them to
            //              the element created in the last step. Append that
            //              new element to furthest block."
            let new_element = self.create_element(&formatting_tag.name, &formatting_tag.attributes);
            self.tree.move_children(furthest_block, new_element);
            self.tree.append_child(furthest_block, new_element);

            // STEP 19: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into
            //           the list of active formatting elements at the
            //           position of the aforementioned bookmark."
            if let Some(index) = self.formatting_position(formatting_element) {
                let _ = self.active_formatting_elements.remove(index);
                if bookmark > index {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                FormattingEntry::Element {
                    node: new_element,
                    tag: formatting_tag,
                },
            );

            // STEP 20: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack
            //           of open elements immediately below the position of
            //           furthest block in that stack."
            self.stack_of_open_elements
                .retain(|&id| id != formatting_element);
            if let Some(position) = self.stack_position(furthest_block) {
                self.stack_of_open_elements.insert(position + 1, new_element);
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        let original = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        match token {
            Token::Character { data } => {
                self.insert_character(*data);
                self.original_insertion_mode = Some(original);
            }
            Token::EndOfFile => {
                self.parse_error("end of file inside raw text element");
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = original;
                self.process_token(token);
            }
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = original;
            }
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => self.handle_in_body_mode(token),
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_into(html, data);
            }
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after </body>");
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            _ if Self::is_whitespace_token(token) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after </html>");
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }
}

/// "...that have the same tag name, namespace, and attributes as element"
/// Attribute order does not matter.
fn same_formatting_tag(a: &FormattingTag, b: &FormattingTag) -> bool {
    a.name == b.name
        && a.attributes.len() == b.attributes.len()
        && a.attributes.iter().all(|attr| b.attributes.contains(attr))
}

/// "A start tag whose tag name is "input"... If the token does not have an
/// attribute with the name "type", or if it does, but that attribute's value
/// is not an ASCII case-insensitive match for the string "hidden"..."
fn is_hidden_input(attributes: &[Attribute]) -> bool {
    attributes
        .iter()
        .any(|attr| attr.name == "type" && attr.value.eq_ignore_ascii_case("hidden"))
}

/// Render the subtree rooted at `id` as an indented outline, one node per
/// line. Attributes are sorted so the output is stable.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(depth);
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::Doctype(name) => writeln!(out, "{prefix}<!DOCTYPE {name}>"),
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            let rendered: String = attrs
                .into_iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        format!(" {k}")
                    } else {
                        format!(" {k}=\"{v}\"")
                    }
                })
                .collect();
            writeln!(out, "{prefix}<{}{rendered}>", data.tag_name)
        }
        NodeType::Text(text) => {
            writeln!(out, "{prefix}\"{}\"", text.replace('\n', "\\n"))
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        write_tree(tree, child, depth + 1, out);
    }
}
