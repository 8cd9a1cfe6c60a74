//! The harness's custom pseudo-classes.
//!
//! Selector text in the harness input uses a handful of non-standard
//! pseudo-classes. All of them are registered with the selector engine as
//! pass-through. Those without arguments are also stripped from the text
//! before it reaches the engine.

use std::str::FromStr;

use selcov_css::EngineConfig;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// An extension pseudo-class, written `:name` or `::name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CustomPseudo {
    /// `:deferred`
    Deferred,
    /// `:pass(n)`
    Pass,
    /// `:match("re")`
    Match,
    /// `::after`
    After,
    /// `::before`
    Before,
    /// `::outside`
    Outside,
}

impl CustomPseudo {
    /// The lowercase name without colons.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// `:pass()` and `:match()` take an argument and are handed to the
    /// engine intact.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        matches!(self, Self::Pass | Self::Match)
    }

    /// Whether occurrences are removed from selector text.
    #[must_use]
    pub const fn is_stripped(self) -> bool {
        !self.takes_argument()
    }
}

/// How many occurrences of each stripped pseudo-class are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StripMode {
    /// Every occurrence.
    #[default]
    All,
    /// The first occurrence of each name only.
    First,
}

/// Engine configuration with every [`CustomPseudo`] registered as
/// pass-through.
#[must_use]
pub fn engine_config() -> EngineConfig {
    EngineConfig::builder()
        .pass_through(CustomPseudo::iter().map(CustomPseudo::name))
        .build()
}

/// Remove stripped custom pseudo-classes from `selector`.
///
/// A token is `:name` or `::name`, matched ASCII case-insensitively and only
/// as a whole identifier, so `:beforehand` is kept. Quoted strings and
/// escaped characters are copied untouched.
///
/// ```
/// use selcov_coverage::{StripMode, strip_custom_pseudos};
///
/// assert_eq!(strip_custom_pseudos("a:before:before", StripMode::All), "a");
/// assert_eq!(strip_custom_pseudos("a:before:before", StripMode::First), "a:before");
/// assert_eq!(strip_custom_pseudos("li:pass(2)::after", StripMode::All), "li:pass(2)");
/// assert_eq!(strip_custom_pseudos(r#"[title=":deferred"]"#, StripMode::All), r#"[title=":deferred"]"#);
/// ```
#[must_use]
pub fn strip_custom_pseudos(selector: &str, mode: StripMode) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut seen: Vec<CustomPseudo> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = selector.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                out.push(c);
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            }
            (Some(open), _) if c == open => {
                quote = None;
                out.push(c);
            }
            (None, '"' | '\'') => {
                quote = Some(c);
                out.push(c);
            }
            (None, ':') => {
                if let Some((pseudo, len)) = custom_pseudo_at(&selector[i..])
                    && pseudo.is_stripped()
                    && (mode == StripMode::All || !seen.contains(&pseudo))
                {
                    seen.push(pseudo);
                    while chars.next_if(|&(j, _)| j < i + len).is_some() {}
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// The custom pseudo-class starting at the colon that begins `text`, and
/// the byte length of the whole token.
fn custom_pseudo_at(text: &str) -> Option<(CustomPseudo, usize)> {
    let name_start = text
        .strip_prefix("::")
        .or_else(|| text.strip_prefix(':'))?;
    let prefix_len = text.len() - name_start.len();
    let name_len = name_start
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()))
        .unwrap_or(name_start.len());
    let pseudo = CustomPseudo::from_str(&name_start[..name_len]).ok()?;
    Some((pseudo, prefix_len + name_len))
}
