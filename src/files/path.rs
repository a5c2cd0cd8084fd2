use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::error::{ServeError, ServeResult};

/// The directory every request is resolved against.
#[derive(Debug, Clone)]
pub struct WebRoot {
    root: PathBuf,
}

/// A request path accepted by [`WebRoot::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Normalized segments joined with `/`, empty for the root itself
    pub relative: String,
    /// `relative` joined onto the web root
    pub absolute: PathBuf,
}

impl ResolvedPath {
    /// The normalized path as a route: `/` for the root, `/a/b` below it.
    pub fn route(&self) -> String {
        format!("/{}", self.relative)
    }
}

impl WebRoot {
    /// Creates the directory if needed and anchors on its canonical form.
    pub fn create(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: std::fs::canonicalize(root)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Maps a raw request target onto the web root.
    ///
    /// The query string is dropped, the rest is URL-decoded (`+` as
    /// space), leading slashes are stripped and `.`/`..` segments are
    /// collapsed. A `..` that would climb above the root is rejected.
    pub fn resolve(&self, raw: &str) -> ServeResult<ResolvedPath> {
        let without_query = raw.split_once('?').map_or(raw, |(path, _)| path);
        let plus_decoded = without_query.replace('+', " ");
        let decoded = percent_decode_str(&plus_decoded).decode_utf8_lossy();

        let relative = normalize(&decoded)
            .ok_or_else(|| ServeError::PathTraversal(raw.to_string()))?;

        let mut absolute = self.root.clone();
        if !relative.is_empty() {
            absolute.push(&relative);
        }

        Ok(ResolvedPath { relative, absolute })
    }

    /// Follows symlinks on an existing path and checks the target still
    /// lies under the web root.
    pub async fn contain(&self, path: &Path) -> ServeResult<PathBuf> {
        let canonical = match fs::canonicalize(path).await {
            Ok(p) => p,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServeError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ServeError::Io(e)),
        };
        if !canonical.starts_with(&self.root) {
            return Err(ServeError::PathTraversal(path.display().to_string()));
        }
        Ok(canonical)
    }
}

/// Collapses a decoded path into root-relative segments, or `None` when it
/// escapes the root.
fn normalize(decoded: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}
