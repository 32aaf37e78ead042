//! Recursive file enumeration under the scan root.
//!
//! # Responsibilities
//! - Walk the tree depth-first from the canonical root
//! - Prune ignored directories before descending
//! - Produce root-relative, `/`-separated entries
//! - Bound scan time when called from a request

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use walkdir::WalkDir;

use crate::scan::filter::PathFilter;

/// One regular file discovered under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Root-relative path, always starting with `/`.
    pub relative_path: String,
    /// File size, present when the scan tracks sizes.
    pub size_bytes: Option<u64>,
}

impl Entry {
    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }
}

/// Error type for scan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {path:?} is not accessible: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scan root {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("scan did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("scan was cancelled")]
    Cancelled,
    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Immutable scan settings shared by every request.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    root: PathBuf,
    filter: PathFilter,
    follow_symlinks: bool,
    track_sizes: bool,
}

impl ScanConfig {
    /// Build a scan configuration. The root is canonicalized once here.
    pub fn new(root: impl AsRef<Path>, filter: PathFilter) -> Result<Self, ScanError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| ScanError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(ScanError::NotADirectory(canonical));
        }

        Ok(Self {
            root: canonical,
            filter,
            follow_symlinks: false,
            track_sizes: true,
        })
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_sizes(mut self, track: bool) -> Self {
        self.track_sizes = track;
        self
    }

    /// Canonical scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }
}

/// Walks the scan root and lists every admitted file.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    config: Arc<ScanConfig>,
}

impl DirectoryScanner {
    pub fn new(config: Arc<ScanConfig>) -> Self {
        Self { config }
    }

    /// Walk the whole tree synchronously.
    pub fn scan(&self) -> Result<Vec<Entry>, ScanError> {
        self.scan_until(&AtomicBool::new(false))
    }

    /// Walk the tree, giving up with `Cancelled` once `cancelled` is set.
    pub fn scan_until(&self, cancelled: &AtomicBool) -> Result<Vec<Entry>, ScanError> {
        let root = self.config.root();
        let filter = self.config.filter();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .map(|name| filter.is_ignored_dir(name))
                        .unwrap_or(false))
            });

        let mut entries = Vec::new();
        for item in walker {
            if cancelled.load(Ordering::Relaxed) {
                return Err(ScanError::Cancelled);
            }

            let dent = match item {
                Ok(dent) => dent,
                Err(err) if err.loop_ancestor().is_some() => {
                    tracing::warn!(path = ?err.path(), "Skipping symlink cycle");
                    continue;
                }
                Err(err) if is_dangling_link(&err) => {
                    tracing::warn!(path = ?err.path(), "Skipping dangling symlink");
                    continue;
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    return Err(ScanError::Walk { path, source: err });
                }
            };

            if !dent.file_type().is_file() {
                continue;
            }
            if !filter.allows_file(&dent.file_name().to_string_lossy()) {
                continue;
            }

            let size_bytes = if self.config.track_sizes {
                let metadata = dent.metadata().map_err(|source| ScanError::Walk {
                    path: dent.path().to_path_buf(),
                    source,
                })?;
                Some(metadata.len())
            } else {
                None
            };

            entries.push(Entry {
                relative_path: relative_path(root, dent.path()),
                size_bytes,
            });
        }

        Ok(entries)
    }

    /// Run the scan on the blocking pool, bounded by `limit`.
    ///
    /// On timeout, or when this future is dropped early, the background walk
    /// is told to stop at its next entry.
    pub async fn scan_with_timeout(&self, limit: Duration) -> Result<Vec<Entry>, ScanError> {
        self.scan_cancellable(limit, Arc::new(AtomicBool::new(false)))
            .await
    }

    async fn scan_cancellable(
        &self,
        limit: Duration,
        cancelled: Arc<AtomicBool>,
    ) -> Result<Vec<Entry>, ScanError> {
        let _guard = CancelOnDrop(Arc::clone(&cancelled));
        let scanner = self.clone();
        let task = tokio::task::spawn_blocking(move || scanner.scan_until(&cancelled));

        match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(ScanError::TimedOut(limit)),
        }
    }
}

/// Raises the cancel flag when the owning future completes or is dropped.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// A followed link whose target no longer exists.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    let missing = err
        .io_error()
        .map(|e| e.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    missing
        && err
            .path()
            .and_then(|p| p.symlink_metadata().ok())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

/// Strip the root and join the remaining components with `/`.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
