//! HTML tokenizer module.
//!
//! Implements the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! that affect the shape of the element tree: tags, attributes, text,
//! comments, DOCTYPEs and the raw text states.

/// Character reference parsing per § 13.2.5.72.
pub mod character_reference;
/// HTML tokenizer state machine implementation.
pub mod core;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, TokenizerState, tokenize};
pub use token::{Attribute, Token};
