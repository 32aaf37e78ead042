//! Ignore and allow rules applied during traversal.
//!
//! # Design Decisions
//! - Ignored directories match on base name at any depth
//! - Extension matching is case-sensitive on the raw suffix
//! - An absent allow-list admits every file

use std::collections::HashSet;

/// Directory names skipped when none are configured.
pub const DEFAULT_IGNORED_DIRS: [&str; 4] = [".git", "node_modules", ".vscode", ".idea"];

/// Predicates deciding which directories are walked and which files are listed.
#[derive(Debug, Clone)]
pub struct PathFilter {
    ignored_dir_names: HashSet<String>,
    allowed_extensions: Option<HashSet<String>>,
}

impl PathFilter {
    pub fn new<I, S>(ignored_dir_names: I, allowed_extensions: Option<Vec<String>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_dir_names: ignored_dir_names.into_iter().map(Into::into).collect(),
            allowed_extensions: allowed_extensions.map(|exts| exts.into_iter().collect()),
        }
    }

    /// Returns true if a directory with this base name must not be descended.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dir_names.contains(name)
    }

    /// Returns true if a file with this name belongs in the listing.
    pub fn allows_file(&self, file_name: &str) -> bool {
        match &self.allowed_extensions {
            None => true,
            Some(allowed) => extension_of(file_name)
                .map(|ext| allowed.contains(ext))
                .unwrap_or(false),
        }
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED_DIRS, None)
    }
}

/// Substring after the final `.` of a name, if any.
///
/// Unlike `Path::extension`, a leading dot counts: `.bashrc` has extension
/// `bashrc`.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignores() {
        let filter = PathFilter::default();
        assert!(filter.is_ignored_dir("node_modules"));
        assert!(filter.is_ignored_dir(".git"));
        assert!(!filter.is_ignored_dir("src"));
    }

    #[test]
    fn test_no_allow_list_admits_everything() {
        let filter = PathFilter::default();
        assert!(filter.allows_file("a.txt"));
        assert!(filter.allows_file("Makefile"));
    }

    #[test]
    fn test_allow_list() {
        let filter = PathFilter::new(DEFAULT_IGNORED_DIRS, Some(vec!["txt".into()]));
        assert!(filter.allows_file("a.txt"));
        assert!(filter.allows_file("archive.tar.txt"));
        assert!(!filter.allows_file("a.json"));
        assert!(!filter.allows_file("README"));
        // Case-sensitive
        assert!(!filter.allows_file("A.TXT"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.txt"), Some("txt"));
        assert_eq!(extension_of("a.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".bashrc"), Some("bashrc"));
        assert_eq!(extension_of("trailing."), Some(""));
        assert_eq!(extension_of("noext"), None);
    }
}
