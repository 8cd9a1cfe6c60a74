//! Selector group input.
//!
//! The harness receives a JSON array whose elements are each `null` or an
//! array of selector strings, one element per stylesheet rule.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use thiserror::Error;

/// The selectors of one rule; `None` when the rule had none (`null`).
pub type SelectorGroup = Option<Vec<String>>;

/// Why the selector data could not be read.
#[derive(Debug, Error)]
pub enum InputError {
    /// The text is not JSON, or not an array of `null`/string arrays.
    #[error("invalid selector data")]
    Json(#[from] serde_json::Error),

    /// Reading the data failed.
    #[error("failed to read selector data from {origin}")]
    Io {
        /// Where the data was being read from.
        origin: String,
        /// The underlying error.
        source: io::Error,
    },
}

/// Parse the selector group array.
///
/// ```
/// use selcov_coverage::parse_selector_groups;
///
/// let groups = parse_selector_groups(r#"[["a", "b"], null, []]"#).unwrap();
/// assert_eq!(groups.len(), 3);
/// assert!(groups[1].is_none());
/// assert!(parse_selector_groups(r#"[[1]]"#).is_err());
/// ```
///
/// # Errors
///
/// Returns [`InputError::Json`] for malformed JSON or the wrong shape.
pub fn parse_selector_groups(json: &str) -> Result<Vec<SelectorGroup>, InputError> {
    Ok(serde_json::from_str(json)?)
}

/// Where the selector data comes from, as written on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorSource {
    /// The JSON text itself.
    Inline(String),
    /// `@path`: read from a file.
    File(PathBuf),
    /// `-`: read from standard input.
    Stdin,
}

impl SelectorSource {
    /// Interpret a command-line argument.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else if let Some(path) = arg.strip_prefix('@') {
            Self::File(PathBuf::from(path))
        } else {
            Self::Inline(arg.to_string())
        }
    }

    /// Read the raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] if the file or stdin cannot be read.
    pub fn read_to_string(&self) -> Result<String, InputError> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => fs::read_to_string(path).map_err(|source| InputError::Io {
                origin: path.display().to_string(),
                source,
            }),
            Self::Stdin => {
                let mut text = String::new();
                let _ = io::stdin()
                    .lock()
                    .read_to_string(&mut text)
                    .map_err(|source| InputError::Io {
                        origin: "stdin".to_string(),
                        source,
                    })?;
                Ok(text)
            }
        }
    }

    /// Read and parse the selector groups.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if reading or parsing fails.
    pub fn load(&self) -> Result<Vec<SelectorGroup>, InputError> {
        parse_selector_groups(&self.read_to_string()?)
    }
}
