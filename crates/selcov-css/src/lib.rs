//! CSS selector parsing and matching over selcov DOM trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector parsing** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class, ID and attribute selectors
//!   - Compound and complex selectors with all four combinators
//!   - Selector lists
//!   - CSS escapes in identifiers and strings
//!
//! - **Pseudo-classes**
//!   - Structural: `:root`, `:empty`, `:first-child`, `:nth-child()` and friends
//!   - Logical: `:not()`, `:is()`, `:where()`, `:has()`
//!   - Content and form groups: `:contains()`, `:lang()`, `:checked`, `:input`, ...
//!   - Positional set filters: `:first`, `:last`, `:eq()`, `:lt()`, `:gt()`, ...
//!   - Names registered as pass-through in an [`EngineConfig`]
//!
//! - **Matching** with backtracking combinator evaluation and document-order
//!   result sets.
//!
//! # Not Implemented
//!
//! - Pseudo-elements (except when registered as pass-through)
//! - Namespace prefixes (`svg|rect`)
//! - The `of S` clause of `:nth-child()`
//! - Dynamic user-action states; they parse but never match

/// Selector engine configuration and the compile/select entry points.
pub mod engine;
/// Typed selector errors.
pub mod error;
/// [§ 6.6.5.1 An+B](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax) expressions.
pub mod nth;
/// Selector types, parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;

pub use engine::{EngineConfig, EngineConfigBuilder, SelectorEngine};
pub use error::SelectorError;
pub use nth::Nth;
pub use selector::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, Position, PseudoClass, PseudoClassName, RelativeSelector, SelectorList,
    SimpleSelector,
};
