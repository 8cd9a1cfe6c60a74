use strum_macros::Display;

use super::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The states the tokenizer moves through. Only states that influence which
/// elements and attributes end up in the tree are modelled; script data
/// escaping and the comment less-than-sign states are folded into their
/// parent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// RCDATA, RAWTEXT and script data less-than sign states (§ 13.2.5.9, .12, .15).
    RawTextLessThanSign,
    /// RCDATA, RAWTEXT and script data end tag open states (§ 13.2.5.10, .13, .16).
    RawTextEndTagOpen,
    /// RCDATA, RAWTEXT and script data end tag name states (§ 13.2.5.11, .14, .17).
    RawTextEndTagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// Public and system identifiers are not tokenized; anything after the
    /// name is skipped in [`TokenizerState::BogusDOCTYPE`].
    AfterDOCTYPEName,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to
/// tokenize HTML."
///
/// The tokenizer runs to completion before tree construction starts, so the
/// raw text state switches that the tree builder would normally request are
/// made here when the corresponding start tag is emitted.
pub struct HTMLTokenizer {
    /// Normalized input (CR and CRLF replaced by LF).
    pub(super) input: String,
    /// Byte offset of the next input character.
    pub(super) current_pos: usize,
    /// Current state of the state machine.
    pub(super) state: TokenizerState,
    /// The raw text state to return to from the raw text end tag states.
    pub(super) text_state: TokenizerState,
    /// When set, the next iteration reprocesses `current_input_character`.
    pub(super) reconsume: bool,
    /// "The current input character is the last character to have been consumed."
    pub(super) current_input_character: Option<char>,
    /// The tag, comment or DOCTYPE token being built.
    pub(super) current_token: Option<Token>,
    /// Tag name of the last emitted start tag, for "appropriate end tag" checks.
    pub(super) last_start_tag_name: Option<String>,
    /// "The temporary buffer"
    pub(super) temporary_buffer: String,
    /// Tokens emitted so far.
    pub(super) token_stream: Vec<Token>,
    /// Number of parse errors seen.
    pub(super) parse_errors: usize,
    /// Set once the end-of-file token has been emitted.
    pub(super) at_eof: bool,
}

impl HTMLTokenizer {
    /// Create a tokenizer over `input`.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input = input.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            input,
            current_pos: 0,
            state: TokenizerState::Data,
            text_state: TokenizerState::Data,
            reconsume: false,
            current_input_character: None,
            current_token: None,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            token_stream: Vec::new(),
            parse_errors: 0,
            at_eof: false,
        }
    }

    /// Start in a state other than Data, e.g. RCDATA to tokenize the
    /// contents of a `<title>` in isolation.
    #[must_use]
    pub const fn with_initial_state(mut self, state: TokenizerState) -> Self {
        self.state = state;
        self.text_state = state;
        self
    }

    /// Drive the state machine until the end-of-file token is emitted.
    pub fn run(&mut self) {
        while !self.at_eof {
            let c = if self.reconsume {
                self.reconsume = false;
                self.current_input_character
            } else {
                let c = self.consume();
                self.current_input_character = c;
                c
            };
            self.step(c);
        }
    }

    /// Tokens emitted so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.token_stream
    }

    /// Consume the tokenizer and return its token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Number of parse errors encountered.
    #[must_use]
    pub const fn parse_error_count(&self) -> usize {
        self.parse_errors
    }

    /// Current state of the state machine.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    fn step(&mut self, c: Option<char>) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(c),
            TokenizerState::RCDATA => self.handle_rcdata_state(c),
            TokenizerState::RAWTEXT | TokenizerState::ScriptData => {
                self.handle_rawtext_state(c);
            }
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(c),
            TokenizerState::TagOpen => self.handle_tag_open_state(c),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(c),
            TokenizerState::TagName => self.handle_tag_name_state(c),
            TokenizerState::RawTextLessThanSign => self.handle_raw_text_less_than_sign_state(c),
            TokenizerState::RawTextEndTagOpen => self.handle_raw_text_end_tag_open_state(c),
            TokenizerState::RawTextEndTagName => self.handle_raw_text_end_tag_name_state(c),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(c),
            TokenizerState::AttributeName => self.handle_attribute_name_state(c),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(c),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state(c, '"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state(c, '\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(c),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state(c);
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(c),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(c),
            TokenizerState::CommentStart => self.handle_comment_start_state(c),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(c),
            TokenizerState::Comment => self.handle_comment_state(c),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(c),
            TokenizerState::CommentEnd => self.handle_comment_end_state(c),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(c),
            TokenizerState::DOCTYPE => self.handle_doctype_state(c),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(c),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(c),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(c),
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(c),
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: Option<char>) {
        match c {
            // "U+0026 AMPERSAND (&)"
            Some('&') => self.emit_character_reference(),
            // "U+003C LESS-THAN SIGN (<)"
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL: This is an unexpected-null-character parse error."
            // The tree builder ignores it in body, so it is dropped here.
            Some('\0') => self.log_parse_error("unexpected-null-character"),
            Some(c) => self.emit_character_token(c),
            None => self.emit_eof_token(),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self, c: Option<char>) {
        match c {
            Some('&') => self.emit_character_reference(),
            Some('<') => self.switch_to(TokenizerState::RawTextLessThanSign),
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.emit_character_token('\u{FFFD}');
            }
            Some(c) => self.emit_character_token(c),
            None => self.emit_eof_token(),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_rawtext_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => self.switch_to(TokenizerState::RawTextLessThanSign),
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.emit_character_token('\u{FFFD}');
            }
            Some(c) => self.emit_character_token(c),
            None => self.emit_eof_token(),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self, c: Option<char>) {
        match c {
            Some('\0') => self.emit_character_token('\u{FFFD}'),
            Some(c) => self.emit_character_token(c),
            None => self.emit_eof_token(),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, c: Option<char>) {
        match c {
            // "U+0021 EXCLAMATION MARK (!): Switch to the markup declaration open state."
            Some('!') => self.markup_declaration_open(),
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is an unexpected-question-mark-instead-of-tag-name parse error."
            Some('?') => {
                self.log_parse_error("unexpected-question-mark-instead-of-tag-name");
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            Some(_) => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
            None => {
                self.log_parse_error("eof-before-tag-name");
                self.emit_character_token('<');
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Entered straight from the tag open state; looks ahead without
    /// consuming until a branch is chosen.
    fn markup_declaration_open(&mut self) {
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::CommentStart);
        } else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::DOCTYPE);
        } else if self.next_few_characters_are("[CDATA[") {
            // Outside foreign content: "This is a cdata-in-html-content parse
            // error. Create a comment token whose data is the "[CDATA[" string."
            self.log_parse_error("cdata-in-html-content");
            self.consume_string("[CDATA[");
            let mut comment = Token::new_comment();
            for c in "[CDATA[".chars() {
                comment.append_to_comment(c);
            }
            self.current_token = Some(comment);
            self.switch_to(TokenizerState::BogusComment);
        } else {
            self.log_parse_error("incorrectly-opened-comment");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('>') => {
                self.log_parse_error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            Some(_) => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            None => {
                self.log_parse_error("eof-before-tag-name");
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            Some('\0') => self.append_to_tag_name('\u{FFFD}'),
            // "ASCII upper alpha: Append the lowercase version of the current
            // input character to the current tag token's tag name."
            Some(c) => self.append_to_tag_name(c.to_ascii_lowercase()),
            // "This is an eof-in-tag parse error. Emit an end-of-file token."
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn handle_raw_text_less_than_sign_state(&mut self, c: Option<char>) {
        if c == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::RawTextEndTagOpen);
        } else {
            self.emit_character_token('<');
            self.reconsume_in(self.text_state);
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_raw_text_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::RawTextEndTagName);
            }
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(self.text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn handle_raw_text_end_tag_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => self.emit_current_tag(),
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            _ => self.emit_raw_text_end_tag_name_anything_else(),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name parse
            // error. Start a new attribute in the current tag token. Set that
            // attribute's name to the current input character"
            Some('=') => {
                self.log_parse_error("unexpected-equals-sign-before-attribute-name");
                self.start_new_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => self.append_to_attribute_name('\u{FFFD}'),
            Some(c @ ('"' | '\'' | '<')) => {
                self.log_parse_error("unexpected-character-in-attribute-name");
                self.append_to_attribute_name(c);
            }
            Some(c) => self.append_to_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            Some('>') => {
                self.log_parse_error("missing-attribute-value");
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, c: Option<char>, quote: char) {
        match c {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => self.append_attribute_character_reference(),
            Some('\0') => self.append_to_attribute_value('\u{FFFD}'),
            Some(c) => self.append_to_attribute_value(c),
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => self.append_attribute_character_reference(),
            Some('>') => self.emit_current_tag(),
            Some('\0') => self.append_to_attribute_value('\u{FFFD}'),
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.log_parse_error("unexpected-character-in-unquoted-attribute-value");
                self.append_to_attribute_value(c);
            }
            Some(c) => self.append_to_attribute_value(c),
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            Some(_) => {
                self.log_parse_error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.emit_current_tag();
            }
            Some(_) => {
                self.log_parse_error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => self.append_to_comment('\u{FFFD}'),
            Some(c) => self.append_to_comment(c),
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => {
                self.log_parse_error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.log_parse_error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => self.append_to_comment('\u{FFFD}'),
            Some(c) => self.append_to_comment(c),
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment('-'),
            Some(_) => {
                self.append_to_comment('-');
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                for c in "--!".chars() {
                    self.append_to_comment(c);
                }
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.log_parse_error("incorrectly-closed-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(_) => {
                for c in "--!".chars() {
                    self.append_to_comment(c);
                }
                self.reconsume_in(TokenizerState::Comment);
            }
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            Some(_) => {
                self.log_parse_error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
            None => self.emit_quirks_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.log_parse_error("missing-doctype-name");
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(c) => {
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(if c == '\0' {
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                });
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            None => self.emit_quirks_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(c) => {
                let c = if c == '\0' {
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name(c);
                }
            }
            None => self.emit_quirks_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(_) => self.switch_to(TokenizerState::BogusDOCTYPE),
            None => self.emit_quirks_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(_) => {}
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
        }
    }
}

/// Tokenize `input` from the data state and return every token, ending with
/// [`Token::EndOfFile`].
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}
