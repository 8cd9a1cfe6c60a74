//! Document location helpers.
//!
//! [RFC 8089 The "file" URI Scheme](https://www.rfc-editor.org/rfc/rfc8089)
//!
//! The harness addresses documents the way a browser would, as `file://`
//! URLs, but reads them through the filesystem. A location is either such a
//! URL or a plain filesystem path.

use std::path::{Path, PathBuf};

use url::Url;

/// Turn a document location into a filesystem path.
///
/// A `file:` URL is parsed and its percent-encoded path decoded;
/// `file://localhost/path` names the same file as `file:///path`. Anything
/// else, including a `file:` URL naming a remote host, is taken as a literal
/// path, so `%20` in a plain path stays as written.
#[must_use]
pub fn document_path(location: &str) -> PathBuf {
    if let Ok(url) = Url::parse(location)
        && url.scheme() == "file"
        && let Ok(path) = url.to_file_path()
    {
        return path;
    }
    PathBuf::from(location)
}

/// Resolve a document location against the root directory.
///
/// STEP 1: Turn a `file:` URL into a path.
///
/// STEP 2: "If url is an absolute URL, return url." An absolute path is used
/// as-is.
///
/// STEP 3: Otherwise, resolve relative to the root directory.
#[must_use]
pub fn resolve_document_path(root: &Path, location: &str) -> PathBuf {
    // STEP 1
    let path = document_path(location);

    // STEP 2
    if path.is_absolute() {
        return path;
    }

    // STEP 3
    root.join(path)
}
