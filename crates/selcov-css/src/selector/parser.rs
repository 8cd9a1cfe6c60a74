//! Selector text to [`SelectorList`].
//!
//! [§ 17 Grammar](https://www.w3.org/TR/selectors-4/#grammar), read with a
//! single forward cursor over the input. Positions in errors are byte
//! offsets into the text passed to [`parse_selector_list`].

use std::str::FromStr;

use super::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, Position, PseudoClass, PseudoClassName, RelativeSelector, SelectorList,
    SimpleSelector,
};
use crate::engine::EngineConfig;
use crate::error::SelectorError;
use crate::nth::Nth;

/// CSS2 pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Parse a comma-separated selector list.
///
/// Names registered as pass-through in `config` are accepted with `:` or
/// `::` and with or without a parenthesized argument.
///
/// # Errors
///
/// Returns a [`SelectorError`] describing the first problem found.
pub fn parse_selector_list(text: &str, config: &EngineConfig) -> Result<SelectorList, SelectorError> {
    if text.chars().all(is_whitespace) {
        return Err(SelectorError::Empty);
    }
    let mut parser = SelectorParser {
        input: text,
        pos: 0,
        config,
        depth: 0,
    };
    let list = parser.parse_list()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(list),
        Some(c) => Err(parser.unexpected(c)),
    }
}

/// One item of a compound: an element test or a positional filter.
enum Component {
    Simple(SimpleSelector),
    Position(String, Position),
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
    config: &'a EngineConfig,
    /// Nesting inside `:not()`, `:is()`, `:where()` and `:has()`.
    depth: usize,
}

// =============================================================================
// Cursor
// =============================================================================

impl SelectorParser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    const fn unexpected(&self, character: char) -> SelectorError {
        SelectorError::UnexpectedCharacter {
            character,
            offset: self.pos,
        }
    }

    /// The error for "expected something here".
    fn unexpected_here(&self) -> SelectorError {
        match self.peek() {
            Some(c) => self.unexpected(c),
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected_here())
        }
    }
}

// =============================================================================
// Lists, complex and compound selectors
// =============================================================================

impl SelectorParser<'_> {
    /// [§ 3.5](https://www.w3.org/TR/selectors-4/#selector-list) `<complex-selector-list>`
    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            if self.peek() != Some(',') {
                break;
            }
            self.advance();
        }
        Ok(SelectorList { selectors })
    }

    /// [§ 3.4](https://www.w3.org/TR/selectors-4/#relative) `<relative-selector-list>`
    fn parse_relative_list(&mut self) -> Result<Vec<RelativeSelector>, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                _ => Combinator::Descendant,
            };
            if combinator != Combinator::Descendant {
                self.advance();
                self.skip_whitespace();
            }
            let selector = self.parse_complex()?;
            selectors.push(RelativeSelector {
                combinator,
                selector,
            });
            self.skip_whitespace();
            if self.peek() != Some(',') {
                break;
            }
            self.advance();
        }
        Ok(selectors)
    }

    /// [§ 3.3](https://www.w3.org/TR/selectors-4/#complex) `<complex-selector>`
    ///
    /// Compounds are read left to right and stored right to left.
    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut positions: Vec<(String, Position)>;

        loop {
            let (compound, compound_positions) = self.parse_compound()?;
            compounds.push(compound);
            positions = compound_positions;

            let before_whitespace = self.pos;
            self.skip_whitespace();
            let had_whitespace = self.pos > before_whitespace;

            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(c) => return Err(self.unexpected(c)),
            };

            if let Some((name, _)) = positions.first() {
                return Err(SelectorError::MisplacedPositional(name.clone()));
            }

            if combinator != Combinator::Descendant {
                let offset = self.pos;
                let symbol = self.next_char().unwrap_or_default();
                self.skip_whitespace();
                if matches!(self.peek(), None | Some(',' | ')')) {
                    return Err(SelectorError::DanglingCombinator {
                        combinator: symbol,
                        offset,
                    });
                }
            }
            combinators.push(combinator);
        }

        let subject = compounds.pop().unwrap_or_default();
        let combinators = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();
        Ok(ComplexSelector {
            subject,
            combinators,
            positions: positions.into_iter().map(|(_, p)| p).collect(),
        })
    }

    /// [§ 3.2](https://www.w3.org/TR/selectors-4/#compound) `<compound-selector>`
    ///
    /// Positional filters may only be followed by further positional filters.
    fn parse_compound(
        &mut self,
    ) -> Result<(CompoundSelector, Vec<(String, Position)>), SelectorError> {
        let mut simple_selectors = Vec::new();
        let mut positions: Vec<(String, Position)> = Vec::new();

        match self.peek() {
            Some('*') => {
                self.advance();
                simple_selectors.push(SimpleSelector::Universal);
            }
            Some(c) if starts_identifier(c, self.peek_second()) => {
                let name = self.parse_name()?;
                simple_selectors.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            let simple = match self.peek() {
                Some('.') => {
                    self.advance();
                    SimpleSelector::Class(self.parse_identifier()?)
                }
                Some('#') => {
                    self.advance();
                    SimpleSelector::Id(self.parse_name()?)
                }
                Some('[') => SimpleSelector::Attribute(self.parse_attribute()?),
                Some(':') => match self.parse_pseudo()? {
                    Component::Simple(simple) => simple,
                    Component::Position(name, position) => {
                        positions.push((name, position));
                        continue;
                    }
                },
                _ => break,
            };
            if let Some((name, _)) = positions.first() {
                return Err(SelectorError::MisplacedPositional(name.clone()));
            }
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() && positions.is_empty() {
            return Err(self.unexpected_here());
        }
        Ok((CompoundSelector { simple_selectors }, positions))
    }
}

// =============================================================================
// Identifiers, escapes and strings
// =============================================================================

impl SelectorParser<'_> {
    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name),
    /// requiring a valid identifier start.
    fn parse_identifier(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(c) if starts_identifier(c, self.peek_second()) => self.parse_name(),
            _ => Err(self.unexpected_here()),
        }
    }

    /// A run of name code points and escapes; may start with a digit, as
    /// ids and unquoted attribute values in real pages do.
    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.advance();
                name.push(self.consume_escape());
            } else if is_name_char(c) {
                self.advance();
                name.push(c);
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.unexpected_here());
        }
        Ok(name)
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point),
    /// called after the backslash.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.peek() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            self.advance();
            return c;
        }

        let mut value: u32 = 0;
        for _ in 0..6 {
            let Some(digit) = self.peek().and_then(|h| h.to_digit(16)) else {
                break;
            };
            value = value * 16 + digit;
            self.advance();
        }
        // "If the next input code point is whitespace, consume it as well."
        if self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
        match char::from_u32(value) {
            Some(ch) if value != 0 => ch,
            _ => char::REPLACEMENT_CHARACTER,
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn parse_string(&mut self) -> Result<String, SelectorError> {
        let offset = self.pos;
        let quote = self.next_char().ok_or(SelectorError::UnexpectedEnd)?;
        let mut value = String::new();
        loop {
            match self.next_char() {
                None => return Err(SelectorError::UnterminatedString(offset)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.peek() {
                    None => return Err(SelectorError::UnterminatedString(offset)),
                    Some('\n') => self.advance(),
                    Some(_) => value.push(self.consume_escape()),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

// =============================================================================
// Attribute selectors
// =============================================================================

impl SelectorParser<'_> {
    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let offset = self.pos;
        let malformed = |reason| SelectorError::MalformedAttribute { offset, reason };
        self.advance();
        self.skip_whitespace();

        if !self.peek().is_some_and(|c| c == '\\' || is_name_char(c)) {
            return Err(malformed("expected an attribute name"));
        }
        let name = self.parse_name()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.next_char() {
            Some(']') => {
                return Ok(AttributeSelector {
                    name,
                    value: None,
                    case: CaseSensitivity::Default,
                });
            }
            Some('=') => AttributeOperator::Equals,
            Some(prefix @ ('~' | '|' | '^' | '$' | '*' | '!')) => {
                if self.next_char() != Some('=') {
                    return Err(malformed("expected `=` after the operator"));
                }
                match prefix {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    _ => AttributeOperator::NotEquals,
                }
            }
            None => return Err(malformed("missing closing bracket")),
            Some(_) => return Err(malformed("expected an operator or closing bracket")),
        };
        self.skip_whitespace();

        let value = match self.peek() {
            Some('"' | '\'') => self.parse_string()?,
            Some(c) if c == '\\' || is_name_char(c) => self.parse_name()?,
            _ => return Err(malformed("expected an attribute value")),
        };
        self.skip_whitespace();

        let case = match self.peek() {
            Some('i' | 'I') => CaseSensitivity::Insensitive,
            Some('s' | 'S') => CaseSensitivity::Sensitive,
            _ => CaseSensitivity::Default,
        };
        if case != CaseSensitivity::Default {
            self.advance();
            self.skip_whitespace();
        }

        if self.next_char() != Some(']') {
            return Err(malformed("missing closing bracket"));
        }
        Ok(AttributeSelector {
            name,
            value: Some((operator, value)),
            case,
        })
    }
}

// =============================================================================
// Pseudo-classes
// =============================================================================

impl<'a> SelectorParser<'a> {
    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn parse_pseudo(&mut self) -> Result<Component, SelectorError> {
        self.advance();
        let element_syntax = self.peek() == Some(':');
        if element_syntax {
            self.advance();
        }
        let name = self.parse_identifier()?.to_ascii_lowercase();

        if self.config.is_pass_through(&name) {
            if self.peek() == Some('(') {
                let _ = self.parse_raw_argument()?;
            }
            return Ok(Component::Simple(SimpleSelector::PseudoClass(
                PseudoClass::PassThrough(name),
            )));
        }
        if element_syntax || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            return Err(SelectorError::UnsupportedPseudoElement(name));
        }
        let Ok(kind) = PseudoClassName::from_str(&name) else {
            return Err(SelectorError::UnknownPseudoClass(name));
        };

        let has_argument = self.peek() == Some('(');
        if kind.takes_argument() && !has_argument {
            return Err(SelectorError::MissingArgument(name));
        }
        if !kind.takes_argument() && has_argument {
            return Err(self.unexpected('('));
        }
        if kind.is_positional() && self.depth > 0 {
            return Err(SelectorError::MisplacedPositional(name));
        }

        let pseudo = match kind {
            PseudoClassName::Root => PseudoClass::Root,
            PseudoClassName::Empty => PseudoClass::Empty,
            PseudoClassName::Parent => PseudoClass::Parent,
            PseudoClassName::FirstChild => PseudoClass::FirstChild,
            PseudoClassName::LastChild => PseudoClass::LastChild,
            PseudoClassName::OnlyChild => PseudoClass::OnlyChild,
            PseudoClassName::FirstOfType => PseudoClass::FirstOfType,
            PseudoClassName::LastOfType => PseudoClass::LastOfType,
            PseudoClassName::OnlyOfType => PseudoClass::OnlyOfType,
            PseudoClassName::NthChild => PseudoClass::NthChild(self.parse_nth_argument()?),
            PseudoClassName::NthLastChild => PseudoClass::NthLastChild(self.parse_nth_argument()?),
            PseudoClassName::NthOfType => PseudoClass::NthOfType(self.parse_nth_argument()?),
            PseudoClassName::NthLastOfType => {
                PseudoClass::NthLastOfType(self.parse_nth_argument()?)
            }
            PseudoClassName::Not => PseudoClass::Not(self.parse_nested_list()?),
            PseudoClassName::Is | PseudoClassName::Matches | PseudoClassName::Where => {
                PseudoClass::Is(self.parse_nested_list()?)
            }
            PseudoClassName::Has => {
                self.advance();
                self.depth += 1;
                let relative = self.parse_relative_list()?;
                self.depth -= 1;
                self.expect(')')?;
                PseudoClass::Has(relative)
            }
            PseudoClassName::Contains => PseudoClass::Contains(self.parse_text_argument(&name)?),
            PseudoClassName::Lang => {
                PseudoClass::Lang(self.parse_text_argument(&name)?.to_ascii_lowercase())
            }
            PseudoClassName::Link | PseudoClassName::AnyLink => PseudoClass::Link,
            PseudoClassName::Enabled => PseudoClass::Enabled,
            PseudoClassName::Disabled => PseudoClass::Disabled,
            PseudoClassName::Checked => PseudoClass::Checked,
            PseudoClassName::Selected => PseudoClass::Selected,
            PseudoClassName::Header => PseudoClass::Header,
            PseudoClassName::Input => PseudoClass::Input,
            PseudoClassName::Button => PseudoClass::Button,
            PseudoClassName::Text => PseudoClass::Text,
            PseudoClassName::Radio
            | PseudoClassName::Checkbox
            | PseudoClassName::File
            | PseudoClassName::Password
            | PseudoClassName::Image => PseudoClass::InputType(kind.into()),
            PseudoClassName::Submit | PseudoClassName::Reset => {
                PseudoClass::SubmitType(kind.into())
            }
            PseudoClassName::Hover
            | PseudoClassName::Active
            | PseudoClassName::Focus
            | PseudoClassName::FocusWithin
            | PseudoClassName::FocusVisible
            | PseudoClassName::Visited
            | PseudoClassName::Target => PseudoClass::Dynamic(kind),
            PseudoClassName::First => return Ok(Component::Position(name, Position::First)),
            PseudoClassName::Last => return Ok(Component::Position(name, Position::Last)),
            PseudoClassName::Even => return Ok(Component::Position(name, Position::Even)),
            PseudoClassName::Odd => return Ok(Component::Position(name, Position::Odd)),
            PseudoClassName::Eq | PseudoClassName::Nth => {
                let index = self.parse_index_argument(&name)?;
                return Ok(Component::Position(name, Position::Eq(index)));
            }
            PseudoClassName::Lt => {
                let index = self.parse_index_argument(&name)?;
                return Ok(Component::Position(name, Position::Lt(index)));
            }
            PseudoClassName::Gt => {
                let index = self.parse_index_argument(&name)?;
                return Ok(Component::Position(name, Position::Gt(index)));
            }
        };
        Ok(Component::Simple(SimpleSelector::PseudoClass(pseudo)))
    }

    /// `(<selector-list>)` for `:not()`, `:is()` and `:where()`.
    fn parse_nested_list(&mut self) -> Result<SelectorList, SelectorError> {
        self.advance();
        self.depth += 1;
        let list = self.parse_list()?;
        self.depth -= 1;
        self.skip_whitespace();
        self.expect(')')?;
        Ok(list)
    }

    /// The text between balanced parentheses, skipping over quoted strings
    /// and escapes. The cursor ends after the closing parenthesis.
    fn parse_raw_argument(&mut self) -> Result<&'a str, SelectorError> {
        let input = self.input;
        self.advance();
        let start = self.pos;
        let mut depth = 1_usize;
        loop {
            match self.peek() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some('"' | '\'') => {
                    let _ = self.parse_string()?;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('(') => {
                    depth += 1;
                    self.advance();
                }
                Some(')') => {
                    depth -= 1;
                    let end = self.pos;
                    self.advance();
                    if depth == 0 {
                        return Ok(&input[start..end]);
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// [§ 6.6.5.1 An+B](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax) argument.
    fn parse_nth_argument(&mut self) -> Result<Nth, SelectorError> {
        let argument = self.parse_raw_argument()?;
        Nth::parse(argument).ok_or_else(|| SelectorError::InvalidNth(argument.trim().to_string()))
    }

    /// Integer argument of `:eq()`, `:lt()`, `:gt()` and `:nth()`.
    fn parse_index_argument(&mut self, name: &str) -> Result<i64, SelectorError> {
        let argument = self.parse_raw_argument()?;
        argument
            .trim()
            .parse()
            .map_err(|_| SelectorError::InvalidArgument {
                name: name.to_string(),
                argument: argument.trim().to_string(),
            })
    }

    /// A quoted string or bare text argument, as taken by `:contains()` and
    /// `:lang()`. Bare text runs up to the closing parenthesis and must not
    /// be empty.
    fn parse_text_argument(&mut self, name: &str) -> Result<String, SelectorError> {
        self.advance();
        self.skip_whitespace();
        let text = if matches!(self.peek(), Some('"' | '\'')) {
            self.parse_string()?
        } else {
            let mut text = String::new();
            loop {
                match self.peek() {
                    None => return Err(SelectorError::UnexpectedEnd),
                    Some(')') => break,
                    Some('\\') => {
                        self.advance();
                        text.push(self.consume_escape());
                    }
                    Some(c) => {
                        self.advance();
                        text.push(c);
                    }
                }
            }
            let trimmed = text.trim_end_matches(is_whitespace);
            if trimmed.is_empty() {
                return Err(SelectorError::InvalidArgument {
                    name: name.to_string(),
                    argument: String::new(),
                });
            }
            trimmed.to_string()
        };
        self.skip_whitespace();
        self.expect(')')?;
        Ok(text)
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// [name code point](https://www.w3.org/TR/css-syntax-3/#name-code-point)
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier),
/// looking at two.
fn starts_identifier(first: char, second: Option<char>) -> bool {
    match first {
        '-' => second.is_some_and(|c| c == '-' || c == '\\' || (is_name_char(c) && !c.is_ascii_digit())),
        '\\' => true,
        c => is_name_char(c) && !c.is_ascii_digit(),
    }
}
