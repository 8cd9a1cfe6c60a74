//! CSS selector types.
//!
//! Selector text is parsed by [`parser`] into a [`SelectorList`] and
//! evaluated against a [`selcov_dom::DomTree`] by [`matching`], both per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/).

/// Backtracking matcher and document-order selection.
pub mod matching;
/// Selector text to [`SelectorList`].
pub mod parser;

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::nth::Nth;

pub use parser::parse_selector_list;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Stored lowercase. Examples: `div`, `p`, `span`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.nav-item`, `.\31 0`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type=text]`, `[lang|=en]`, `[src$=".png" i]`
    Attribute(AttributeSelector),

    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name, lowercase.
    pub name: String,
    /// Operator and expected value; `None` for `[attr]`.
    pub value: Option<(AttributeOperator, String)>,
    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    pub case: CaseSensitivity,
}

/// The comparison inside an attribute selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[att=val]` "Represents an element with the att attribute whose value
    /// is exactly "val"."
    Equals,
    /// `[att~=val]` "...whose value is a whitespace-separated list of words,
    /// one of which is exactly "val"."
    Includes,
    /// `[att|=val]` "...whose value either being exactly "val" or beginning
    /// with "val" immediately followed by "-"."
    DashMatch,
    /// `[att^=val]` "...whose value begins with the prefix "val"."
    Prefix,
    /// `[att$=val]` "...whose value ends with the suffix "val"."
    Suffix,
    /// `[att*=val]` "...whose value contains at least one instance of the
    /// substring "val"."
    Substring,
    /// `[att!=val]`, the selector-library extension: the attribute is
    /// missing or differs from "val".
    NotEquals,
}

/// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// No flag; values compare exactly.
    #[default]
    Default,
    /// `i` flag: "the attribute value is matched ASCII case-insensitively".
    Insensitive,
    /// `s` flag: "the attribute value is matched identically".
    Sensitive,
}

/// Every pseudo-class name the engine recognises on its own.
///
/// The name table is the `kebab-case` form of each variant; lookup is
/// ASCII case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoClassName {
    /// `:root`
    Root,
    /// `:empty`
    Empty,
    /// `:parent`
    Parent,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:nth-child()`
    NthChild,
    /// `:nth-last-child()`
    NthLastChild,
    /// `:nth-of-type()`
    NthOfType,
    /// `:nth-last-of-type()`
    NthLastOfType,
    /// `:not()`
    Not,
    /// `:is()`
    Is,
    /// `:matches()`, the older name of `:is()`
    Matches,
    /// `:where()`
    Where,
    /// `:has()`
    Has,
    /// `:contains()`
    Contains,
    /// `:lang()`
    Lang,
    /// `:link`
    Link,
    /// `:any-link`
    AnyLink,
    /// `:enabled`
    Enabled,
    /// `:disabled`
    Disabled,
    /// `:checked`
    Checked,
    /// `:selected`
    Selected,
    /// `:header`
    Header,
    /// `:input`
    Input,
    /// `:button`
    Button,
    /// `:text`
    Text,
    /// `:radio`
    Radio,
    /// `:checkbox`
    Checkbox,
    /// `:file`
    File,
    /// `:password`
    Password,
    /// `:image`
    Image,
    /// `:submit`
    Submit,
    /// `:reset`
    Reset,
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `:focus`
    Focus,
    /// `:focus-within`
    FocusWithin,
    /// `:focus-visible`
    FocusVisible,
    /// `:visited`
    Visited,
    /// `:target`
    Target,
    /// `:first`
    First,
    /// `:last`
    Last,
    /// `:even`
    Even,
    /// `:odd`
    Odd,
    /// `:eq()`
    Eq,
    /// `:lt()`
    Lt,
    /// `:gt()`
    Gt,
    /// `:nth()`, an alias of `:eq()`
    Nth,
}

impl PseudoClassName {
    /// Whether the pseudo-class must be written with a parenthesized argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        matches!(
            self,
            Self::NthChild
                | Self::NthLastChild
                | Self::NthOfType
                | Self::NthLastOfType
                | Self::Not
                | Self::Is
                | Self::Matches
                | Self::Where
                | Self::Has
                | Self::Contains
                | Self::Lang
                | Self::Eq
                | Self::Lt
                | Self::Gt
                | Self::Nth
        )
    }

    /// Whether this is a positional set filter rather than an element test.
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            Self::First
                | Self::Last
                | Self::Even
                | Self::Odd
                | Self::Eq
                | Self::Lt
                | Self::Gt
                | Self::Nth
        )
    }
}

/// Pseudo-classes that test a single element against the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children
    /// except, optionally, document white space characters."
    ///
    /// Comments never count; text only counts when it is non-empty.
    Empty,

    /// `:parent`, the inverse of [`PseudoClass::Empty`].
    Parent,

    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.3 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,

    /// [§ 14.3.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    ///
    /// Example: `li:nth-child(2n+1)` matches the odd items of a list.
    NthChild(Nth),
    /// [§ 14.3.2 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),
    /// [§ 14.3.3 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),
    /// [§ 14.3.4 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),

    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "represents an element that is not represented by its argument."
    Not(SelectorList),

    /// [§ 4.2 :is()](https://www.w3.org/TR/selectors-4/#matches) and
    /// [§ 4.4 :where()](https://www.w3.org/TR/selectors-4/#zero-matches).
    /// Specificity is not tracked, so both behave identically.
    Is(SelectorList),

    /// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
    /// "represents an element if any of the relative selectors ... would
    /// match at least one element when anchored against this element."
    Has(Vec<RelativeSelector>),

    /// `:contains(text)`: the element's descendant text contains `text`.
    Contains(String),

    /// [§ 7.2 :lang()](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
    ///
    /// Stored lowercase; matches the language itself or any `-` subtag of it.
    Lang(String),

    /// [§ 8.2 :any-link](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo).
    /// `:link` is identical because nothing is ever visited.
    Link,

    /// [§ 15.1.1 :enabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 15.1.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 15.3.1 :checked](https://www.w3.org/TR/selectors-4/#checked):
    /// checked checkboxes and radios plus selected options.
    Checked,
    /// `:selected`: an `option` with the `selected` attribute.
    Selected,

    /// `:header`: `h1` through `h6`.
    Header,
    /// `:input`: `input`, `select`, `textarea` and `button`.
    Input,
    /// `:button`: `button` elements and `input[type=button]`.
    Button,
    /// `:text`: an `input` with no type or `type=text`.
    Text,
    /// An `input` whose type is the stored keyword (`radio`, `checkbox`,
    /// `file`, `password`, `image`).
    InputType(&'static str),
    /// An `input` or `button` whose type is the stored keyword (`submit`,
    /// `reset`). A `button` without a type is a submit button.
    SubmitType(&'static str),

    /// [§ 9 User action pseudo-classes](https://www.w3.org/TR/selectors-4/#useraction-pseudos)
    /// and `:target`. A static document has no such state, so these never match.
    Dynamic(PseudoClassName),

    /// A name registered as pass-through in the engine configuration.
    /// Always matches, whatever its argument.
    PassThrough(String),
}

/// Positional set filters, applied to the ordered matches of the selector
/// they end rather than to a single element.
///
/// Indices are 0-based; negative indices count back from the end of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// `:first`
    First,
    /// `:last`
    Last,
    /// `:even`: indices 0, 2, 4, ...
    Even,
    /// `:odd`: indices 1, 3, 5, ...
    Odd,
    /// `:eq(n)` and `:nth(n)`
    Eq(i64),
    /// `:lt(n)`
    Lt(i64),
    /// `:gt(n)`
    Gt(i64),
}

/// [§ 3.2 Compound selector](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// All conditions must hold. Empty means "any element".
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators) (` `)
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators) (`>`)
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators) (`+`)
    NextSibling,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators) (`~`)
    SubsequentSibling,
}

/// [§ 3.3 Complex selector](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a sequence of one or more compound selectors
/// separated by combinators."
///
/// Stored right-to-left: `subject` is the rightmost compound and
/// `combinators[0]` relates it to the compound on its left.
/// For `div > p.intro a`: subject = `a`,
/// combinators = `[(Descendant, p.intro), (Child, div)]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    /// The rightmost compound; these are the elements the selector returns.
    pub subject: CompoundSelector,
    /// Combinator and compound pairs walking leftwards from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
    /// Positional filters ending the subject compound, applied in order.
    pub positions: Vec<Position>,
}

/// [§ 3.4 Relative selector](https://www.w3.org/TR/selectors-4/#relative)
///
/// "selectors that represent elements relative to one or more anchor
/// elements", as used by `:has()`. A missing leading combinator means
/// descendant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeSelector {
    /// How the leftmost compound relates to the anchor element.
    pub combinator: Combinator,
    /// The selector to find relative to the anchor.
    pub selector: ComplexSelector,
}

/// [§ 3.5 Selector list](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    /// The alternatives; an element matches if any of them matches.
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Whether any alternative ends in a positional filter.
    #[must_use]
    pub fn has_positions(&self) -> bool {
        self.selectors.iter().any(|s| !s.positions.is_empty())
    }
}
