//! Mapping a URL path onto a file under the scan root.
//!
//! # Responsibilities
//! - Percent-decode the request path
//! - Normalize `.` and `..` lexically, rejecting anything that climbs out
//! - Canonicalize and verify the target is still under the root
//! - Only regular files resolve; directories are not found

use std::path::{Component, Path, PathBuf};

use crate::error::ServeError;

/// A file that may be streamed to the client.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// Decoded root-relative path as requested, before links are resolved.
    pub requested: PathBuf,
    pub len: u64,
}

impl ResolvedFile {
    /// Name the client asked for; content types are chosen from this.
    pub fn requested_name(&self) -> &str {
        self.requested
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// Turn a URL path into a root-relative path without touching the filesystem.
///
/// Returns `None` for undecodable input, NUL bytes, backslashes, and any `..`
/// that would leave the root.
pub fn normalize(url_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(url_path).ok()?;
    if decoded.contains('\0') || decoded.contains('\\') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    let relative: PathBuf = segments.iter().collect();
    // Drive prefixes and the like are not plain names.
    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(relative)
    } else {
        None
    }
}

/// Resolve `url_path` under the canonical `root`.
pub async fn resolve_file(root: &Path, url_path: &str) -> Result<ResolvedFile, ServeError> {
    let relative = match normalize(url_path) {
        Some(rel) if !rel.as_os_str().is_empty() => rel,
        _ => {
            tracing::warn!(path = %url_path, "Rejected path outside scan root");
            return Err(ServeError::NotFound);
        }
    };

    let candidate = root.join(&relative);
    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(path) => path,
        Err(e) if is_missing(&e) => return Err(ServeError::NotFound),
        Err(e) => return Err(ServeError::UnexpectedIo(e)),
    };

    if !canonical.starts_with(root) {
        tracing::warn!(path = %url_path, "Rejected link target outside scan root");
        return Err(ServeError::NotFound);
    }

    let metadata = match tokio::fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(e) if is_missing(&e) => return Err(ServeError::NotFound),
        Err(e) => return Err(ServeError::UnexpectedIo(e)),
    };
    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    Ok(ResolvedFile {
        path: canonical,
        requested: relative,
        len: metadata.len(),
    })
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}
