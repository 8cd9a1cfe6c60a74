//! Document loading.
//!
//! Reads a local HTML file, decodes it, tokenizes it and builds the DOM the
//! coverage evaluator runs against. Only local files are supported; the
//! harness addresses them by path or `file://` URL.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use selcov_common::location::document_path;
use selcov_common::warning::warn_once;
use selcov_dom::DomTree;
use selcov_html::{HTMLParser, HTMLTokenizer};
use thiserror::Error;
use tracing::Level;

/// A parsed document.
pub struct LoadedDocument {
    /// Path the document was read from; empty for in-memory documents.
    pub source_path: String,

    /// Parsed DOM tree.
    pub dom: DomTree,

    /// Tree construction problems, in the order they were seen.
    pub parse_issues: Vec<String>,
}

impl LoadedDocument {
    /// Number of elements in the document, including the implied
    /// `html`, `head` and `body`.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.dom.elements().count()
    }
}

/// Why a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing exists at the path.
    #[error("document not found: {}", path.display())]
    NotFound {
        /// The resolved path.
        path: PathBuf,
    },

    /// The path exists but is a directory or other non-file.
    #[error("not a regular file: {}", path.display())]
    NotAFile {
        /// The resolved path.
        path: PathBuf,
    },

    /// Reading the file failed.
    #[error("failed to read {}", path.display())]
    Io {
        /// The resolved path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl LoadError {
    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::NotAFile { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Load a document from a file path or `file://` URL.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is missing, not a regular file, or
/// cannot be read.
pub fn load_document(location: &str) -> Result<LoadedDocument, LoadError> {
    load_file(&document_path(location))
}

/// Load a document from a filesystem path.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is missing, not a regular file, or
/// cannot be read.
pub fn load_file(path: &Path) -> Result<LoadedDocument, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;
    if !metadata.is_file() {
        return Err(LoadError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    let html = String::from_utf8_lossy(&bytes);

    let mut doc = parse_html_string(&html);
    doc.source_path = path.display().to_string();

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        elements = doc.element_count(),
        issues = doc.parse_issues.len(),
        "loaded document"
    );
    Ok(doc)
}

fn io_error(path: &Path, source: io::Error) -> LoadError {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound { path }
    } else {
        LoadError::Io { path, source }
    }
}

/// Parse an HTML string into a [`LoadedDocument`].
///
/// Tree construction issues are recorded on the document and, when `info`
/// logging is enabled, reported once each on stderr.
#[must_use]
pub fn parse_html_string(html: &str) -> LoadedDocument {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    let tokenizer_errors = tokenizer.parse_error_count();
    let tokens = tokenizer.into_tokens();
    let token_count = tokens.len();

    let (dom, issues) = HTMLParser::new(tokens).run_with_issues();
    let parse_issues: Vec<String> = issues.into_iter().map(|issue| issue.message).collect();

    if tracing::enabled!(Level::INFO) {
        for issue in &parse_issues {
            let _ = warn_once("HTML Parser", issue);
        }
    }
    tracing::debug!(
        tokens = token_count,
        tokenizer_errors,
        tree_issues = parse_issues.len(),
        "parsed html"
    );

    LoadedDocument {
        source_path: String::new(),
        dom,
        parse_issues,
    }
}
