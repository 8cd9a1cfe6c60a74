//! HTML tokenizer and tree builder for selcov.
//!
//! # Scope
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT states
//!   - Tag, attribute, comment, bogus comment and DOCTYPE states
//!   - Named and numeric character references
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Implicit `html`, `head` and `body`; head-only elements
//!   - Void elements and implied end tags
//!   - Table sections, rows and cells
//!
//! # Not Implemented
//!
//! - Adoption agency algorithm
//! - Foster parenting
//! - Templates and foreign content

use selcov_dom::DomTree;

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, InsertionMode, ParseIssue, format_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// Tokenize and tree-build `html` in one go.
///
/// # Example
/// ```
/// let (tree, issues) = selcov_html::parse_html("<p class=intro>Hello");
/// assert!(issues.is_empty());
/// assert_eq!(tree.elements().count(), 4); // html, head, body, p
/// ```
#[must_use]
pub fn parse_html(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let tokens = tokenizer::core::tokenize(html);
    HTMLParser::new(tokens).run_with_issues()
}
