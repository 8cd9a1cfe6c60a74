use thiserror::Error;

/// Why a selector could not be compiled.
///
/// Offsets are byte offsets into the selector text handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector text is empty or whitespace only.
    #[error("empty selector")]
    Empty,

    /// A character that cannot appear at this point.
    #[error("unexpected character {character:?} at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        offset: usize,
    },

    /// The selector ended where more input was required.
    #[error("unexpected end of selector")]
    UnexpectedEnd,

    /// A combinator with nothing to its right.
    #[error("combinator {combinator:?} at offset {offset} is not followed by a selector")]
    DanglingCombinator {
        /// The combinator character (`>`, `+` or `~`).
        combinator: char,
        /// Byte offset of the combinator.
        offset: usize,
    },

    /// A pseudo-class name the engine does not know.
    #[error("unknown pseudo-class :{0}")]
    UnknownPseudoClass(String),

    /// A pseudo-element that is not registered as pass-through.
    #[error("unsupported pseudo-element ::{0}")]
    UnsupportedPseudoElement(String),

    /// A positional filter outside the end of the rightmost compound.
    #[error("positional pseudo-class :{0} must end the rightmost compound selector")]
    MisplacedPositional(String),

    /// An `An+B` argument that does not parse.
    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),

    /// A functional pseudo-class argument of the wrong shape.
    #[error("invalid argument {argument:?} for :{name}()")]
    InvalidArgument {
        /// Pseudo-class name.
        name: String,
        /// The argument text as written.
        argument: String,
    },

    /// A functional pseudo-class written without its argument.
    #[error(":{0} requires an argument")]
    MissingArgument(String),

    /// A quoted string with no closing quote.
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    /// An attribute selector that does not follow `[name op value flag]`.
    #[error("malformed attribute selector at offset {offset}: {reason}")]
    MalformedAttribute {
        /// Byte offset of the opening bracket.
        offset: usize,
        /// What was wrong.
        reason: &'static str,
    },
}
