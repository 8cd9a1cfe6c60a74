//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions, input lookahead, token emission and the small
//! mutations every state performs on the current token.

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current input character is processed again by the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Input that has not been consumed yet.
    pub(super) fn remaining_input(&self) -> &str {
        &self.input[self.current_pos..]
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.remaining_input().starts_with(target)
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.remaining_input()
            .get(..target.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(target))
    }

    /// Consume an ASCII string the caller has already matched.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// Skip `bytes` of input that a lookahead helper already matched.
    pub(super) const fn advance(&mut self, bytes: usize) {
        self.current_pos += bytes;
    }

    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    /// minus CR, which preprocessing removed.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Start tags for raw text elements switch the tokenizer into the state
    /// the tree builder would request:
    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    /// for `title` and `textarea`,
    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    /// for `style`, `xmp`, `iframe`, `noembed`, `noframes` and `noscript`
    /// (scripting enabled), script data for `script`, and PLAINTEXT for
    /// `plaintext`.
    pub(super) fn emit_token(&mut self) {
        self.check_duplicate_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };
        if let Token::StartTag { name, .. } = &token {
            let raw_state = match name.as_str() {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "script" => Some(TokenizerState::ScriptData),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
            if let Some(raw_state) = raw_state {
                self.switch_to(raw_state);
                self.text_state = raw_state;
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.token_stream.push(token);
    }

    /// Leave a tag in the data state and emit it; raw text elements then
    /// override the state in [`Self::emit_token`].
    pub(super) fn emit_current_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_stream.push(Token::new_character(c));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }

    /// "This is an eof-in-comment parse error. Emit the current comment token.
    /// Emit an end-of-file token."
    pub(super) fn emit_comment_at_eof(&mut self) {
        self.log_parse_error("eof-in-comment");
        self.emit_token();
        self.emit_eof_token();
    }

    /// "This is an eof-in-doctype parse error. ... Set its force-quirks flag to
    /// on. Emit the current token. Emit an end-of-file token."
    pub(super) fn emit_quirks_doctype_at_eof(&mut self) {
        self.log_parse_error("eof-in-doctype");
        let mut token = self.current_token.take().unwrap_or_else(Token::new_doctype);
        token.set_force_quirks();
        self.current_token = Some(token);
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// Raw Text Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name, .. })) => name == last_start_tag,
            _ => false,
        }
    }

    /// "Anything else: Emit a U+003C LESS-THAN SIGN character token, a U+002F
    /// SOLIDUS character token, and a character token for each of the
    /// characters in the temporary buffer (in the order they were added to
    /// the buffer). Reconsume in the RCDATA state."
    pub(super) fn emit_raw_text_end_tag_name_anything_else(&mut self) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        self.current_token = None;
        self.reconsume_in(self.text_state);
    }
}

// =============================================================================
// Current Token Helpers
// =============================================================================

impl HTMLTokenizer {
    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_tag_name(c);
        }
    }

    /// "Start a new attribute in the current tag token."
    ///
    /// The previous attribute is complete at this point, so it is checked
    /// for duplicates first.
    pub(super) fn start_new_attribute(&mut self) {
        self.check_duplicate_attribute();
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_name(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        let mut buf = [0; 4];
        self.append_str_to_attribute_value(c.encode_utf8(&mut buf));
    }

    pub(super) fn append_str_to_attribute_value(&mut self, s: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_value(s);
        }
    }

    pub(super) fn append_to_comment(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "...if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error("duplicate-attribute");
            if let Some(token) = self.current_token.as_mut() {
                token.remove_current_attribute();
            }
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Tokenizer errors are never fatal; they are counted and logged at
    /// debug level.
    pub(super) fn log_parse_error(&mut self, code: &str) {
        self.parse_errors += 1;
        tracing::debug!(target: "selcov_html::tokenizer", position = self.current_pos, "{code}");
    }
}
