//! Character reference resolution for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Named references use a subset of the
//! [named character references table](https://html.spec.whatwg.org/multipage/named-characters.html)
//! covering markup-significant characters, typography, Latin-1 letters,
//! currency, arrows, math and Greek. Entries without a trailing semicolon are
//! the legacy forms browsers still accept.

use super::core::HTMLTokenizer;

/// Named character references as `(name, replacement)` pairs. Names include
/// the trailing semicolon when it is part of the reference.
pub static NAMED_CHARACTER_REFERENCES: &[(&str, &str)] = &[
    // Markup-significant
    ("AMP", "&"),
    ("AMP;", "&"),
    ("GT", ">"),
    ("GT;", ">"),
    ("LT", "<"),
    ("LT;", "<"),
    ("QUOT", "\""),
    ("QUOT;", "\""),
    ("amp", "&"),
    ("amp;", "&"),
    ("apos;", "'"),
    ("gt", ">"),
    ("gt;", ">"),
    ("lt", "<"),
    ("lt;", "<"),
    ("quot", "\""),
    ("quot;", "\""),
    // Spacing and typography
    ("nbsp", "\u{00A0}"),
    ("nbsp;", "\u{00A0}"),
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
    ("zwnj;", "\u{200C}"),
    ("zwj;", "\u{200D}"),
    ("shy", "\u{00AD}"),
    ("shy;", "\u{00AD}"),
    ("ndash;", "\u{2013}"),
    ("mdash;", "\u{2014}"),
    ("hellip;", "\u{2026}"),
    ("bull;", "\u{2022}"),
    ("middot", "\u{00B7}"),
    ("middot;", "\u{00B7}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("sbquo;", "\u{201A}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("bdquo;", "\u{201E}"),
    ("laquo", "\u{00AB}"),
    ("laquo;", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("raquo;", "\u{00BB}"),
    ("lsaquo;", "\u{2039}"),
    ("rsaquo;", "\u{203A}"),
    ("dagger;", "\u{2020}"),
    ("Dagger;", "\u{2021}"),
    ("permil;", "\u{2030}"),
    ("prime;", "\u{2032}"),
    ("Prime;", "\u{2033}"),
    ("sect", "\u{00A7}"),
    ("sect;", "\u{00A7}"),
    ("para", "\u{00B6}"),
    ("para;", "\u{00B6}"),
    ("iexcl", "\u{00A1}"),
    ("iexcl;", "\u{00A1}"),
    ("iquest", "\u{00BF}"),
    ("iquest;", "\u{00BF}"),
    // Symbols
    ("COPY", "\u{00A9}"),
    ("COPY;", "\u{00A9}"),
    ("REG", "\u{00AE}"),
    ("REG;", "\u{00AE}"),
    ("copy", "\u{00A9}"),
    ("copy;", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("reg;", "\u{00AE}"),
    ("trade;", "\u{2122}"),
    ("deg", "\u{00B0}"),
    ("deg;", "\u{00B0}"),
    ("micro", "\u{00B5}"),
    ("micro;", "\u{00B5}"),
    ("hearts;", "\u{2665}"),
    ("check;", "\u{2713}"),
    ("star;", "\u{2606}"),
    // Currency
    ("cent", "\u{00A2}"),
    ("cent;", "\u{00A2}"),
    ("pound", "\u{00A3}"),
    ("pound;", "\u{00A3}"),
    ("yen", "\u{00A5}"),
    ("yen;", "\u{00A5}"),
    ("euro;", "\u{20AC}"),
    ("curren", "\u{00A4}"),
    ("curren;", "\u{00A4}"),
    // Math
    ("times", "\u{00D7}"),
    ("times;", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("divide;", "\u{00F7}"),
    ("plusmn", "\u{00B1}"),
    ("plusmn;", "\u{00B1}"),
    ("minus;", "\u{2212}"),
    ("ne;", "\u{2260}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("asymp;", "\u{2248}"),
    ("infin;", "\u{221E}"),
    ("radic;", "\u{221A}"),
    ("sum;", "\u{2211}"),
    ("frac12", "\u{00BD}"),
    ("frac12;", "\u{00BD}"),
    ("frac14", "\u{00BC}"),
    ("frac14;", "\u{00BC}"),
    ("frac34", "\u{00BE}"),
    ("frac34;", "\u{00BE}"),
    ("sup2", "\u{00B2}"),
    ("sup2;", "\u{00B2}"),
    ("not", "\u{00AC}"),
    ("not;", "\u{00AC}"),
    ("notin;", "\u{2209}"),
    // Arrows
    ("larr;", "\u{2190}"),
    ("uarr;", "\u{2191}"),
    ("rarr;", "\u{2192}"),
    ("darr;", "\u{2193}"),
    ("harr;", "\u{2194}"),
    ("lArr;", "\u{21D0}"),
    ("rArr;", "\u{21D2}"),
    // Greek
    ("Alpha;", "\u{0391}"),
    ("Beta;", "\u{0392}"),
    ("Gamma;", "\u{0393}"),
    ("Delta;", "\u{0394}"),
    ("Omega;", "\u{03A9}"),
    ("alpha;", "\u{03B1}"),
    ("beta;", "\u{03B2}"),
    ("gamma;", "\u{03B3}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("lambda;", "\u{03BB}"),
    ("mu;", "\u{03BC}"),
    ("pi;", "\u{03C0}"),
    ("sigma;", "\u{03C3}"),
    ("omega;", "\u{03C9}"),
    // Latin-1 letters
    ("Aacute", "\u{00C1}"),
    ("Aacute;", "\u{00C1}"),
    ("Auml", "\u{00C4}"),
    ("Auml;", "\u{00C4}"),
    ("Ccedil", "\u{00C7}"),
    ("Ccedil;", "\u{00C7}"),
    ("Eacute", "\u{00C9}"),
    ("Eacute;", "\u{00C9}"),
    ("Ntilde", "\u{00D1}"),
    ("Ntilde;", "\u{00D1}"),
    ("Ouml", "\u{00D6}"),
    ("Ouml;", "\u{00D6}"),
    ("Uuml", "\u{00DC}"),
    ("Uuml;", "\u{00DC}"),
    ("aacute", "\u{00E1}"),
    ("aacute;", "\u{00E1}"),
    ("agrave", "\u{00E0}"),
    ("agrave;", "\u{00E0}"),
    ("aring", "\u{00E5}"),
    ("aring;", "\u{00E5}"),
    ("auml", "\u{00E4}"),
    ("auml;", "\u{00E4}"),
    ("ccedil", "\u{00E7}"),
    ("ccedil;", "\u{00E7}"),
    ("eacute", "\u{00E9}"),
    ("eacute;", "\u{00E9}"),
    ("egrave", "\u{00E8}"),
    ("egrave;", "\u{00E8}"),
    ("iacute", "\u{00ED}"),
    ("iacute;", "\u{00ED}"),
    ("ntilde", "\u{00F1}"),
    ("ntilde;", "\u{00F1}"),
    ("oacute", "\u{00F3}"),
    ("oacute;", "\u{00F3}"),
    ("ouml", "\u{00F6}"),
    ("ouml;", "\u{00F6}"),
    ("szlig", "\u{00DF}"),
    ("szlig;", "\u{00DF}"),
    ("uacute", "\u{00FA}"),
    ("uacute;", "\u{00FA}"),
    ("uuml", "\u{00FC}"),
    ("uuml;", "\u{00FC}"),
];

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: &[(u32, char)] = &[
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Look up a named reference by its exact name (with or without `;`).
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_CHARACTER_REFERENCES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, value)| *value)
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// `input` starts right after the `&`. Returns the replacement text and the
/// number of bytes the reference spans.
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the first column of the named
/// character references table."
///
/// "If the character reference was consumed as part of an attribute, and the
/// last character matched is not a U+003B SEMICOLON character (;), and the
/// next input character is either a U+003D EQUALS SIGN character (=) or an
/// ASCII alphanumeric, then, for historical reasons, flush code points
/// consumed as a character reference and switch to the return state."
#[must_use]
pub fn named_character_reference(input: &str, in_attribute: bool) -> Option<(&'static str, usize)> {
    let (name, value) = NAMED_CHARACTER_REFERENCES
        .iter()
        .filter(|(entity, _)| input.starts_with(entity))
        .max_by_key(|(entity, _)| entity.len())?;

    if in_attribute && !name.ends_with(';') {
        let next = input[name.len()..].chars().next();
        if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
            return None;
        }
    }
    Some((*value, name.len()))
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `input` starts right after the `&` and must begin with `#`. Returns the
/// decoded character and the number of bytes consumed, including an optional
/// trailing semicolon. Returns `None` when no digits follow
/// ("absence-of-digits-in-numeric-character-reference").
#[must_use]
pub fn numeric_character_reference(input: &str) -> Option<(char, usize)> {
    let body = input.strip_prefix('#')?;
    let (radix, prefix_len) = match body.as_bytes().first() {
        Some(b'x' | b'X') => (16, 2),
        _ => (10, 1),
    };
    let digits = &input[prefix_len..];
    let digit_count = digits
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digit_count == 0 {
        return None;
    }

    // Saturates instead of overflowing; anything past U+10FFFF is replaced.
    let code = digits[..digit_count]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| acc.saturating_mul(radix).saturating_add(d));

    let mut consumed = prefix_len + digit_count;
    if digits[digit_count..].starts_with(';') {
        consumed += 1;
    }
    Some((resolve_code_point(code), consumed))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Null, surrogate and out-of-range code points become U+FFFD; C1 controls
/// map through the windows-1252 table.
#[must_use]
pub fn resolve_code_point(code: u32) -> char {
    if code == 0 || code > 0x10FFFF {
        return '\u{FFFD}';
    }
    if let Some((_, replacement)) = C1_REPLACEMENTS.iter().find(|(c1, _)| *c1 == code) {
        return *replacement;
    }
    char::from_u32(code).unwrap_or('\u{FFFD}')
}

impl HTMLTokenizer {
    /// Resolve the reference after a consumed `&`, advancing past it.
    /// Returns `None` (and consumes nothing) when the `&` is literal.
    fn consume_character_reference(&mut self, in_attribute: bool) -> Option<String> {
        let rest = self.remaining_input();
        if rest.starts_with('#') {
            let Some((c, len)) = numeric_character_reference(rest) else {
                self.log_parse_error("absence-of-digits-in-numeric-character-reference");
                return None;
            };
            self.advance(len);
            return Some(c.to_string());
        }

        let (value, len) = named_character_reference(rest, in_attribute)?;
        self.advance(len);
        Some(value.to_string())
    }

    /// "Flush code points consumed as a character reference" into the token
    /// stream, for references in data and RCDATA.
    pub(super) fn emit_character_reference(&mut self) {
        match self.consume_character_reference(false) {
            Some(text) => {
                for c in text.chars() {
                    self.emit_character_token(c);
                }
            }
            None => self.emit_character_token('&'),
        }
    }

    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value."
    pub(super) fn append_attribute_character_reference(&mut self) {
        match self.consume_character_reference(true) {
            Some(text) => self.append_str_to_attribute_value(&text),
            None => self.append_to_attribute_value('&'),
        }
    }
}
