//! Ordered template search roots.
//!
//! Lookups are first-found-wins, in insertion order. The collection is
//! seeded from a configuration's root and cloned independently when the
//! configuration is duplicated.

use std::path::{Path, PathBuf};

/// An ordered, duplicate-free list of directories searched for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPaths {
    paths: Vec<PathBuf>,
}

impl LoadPaths {
    /// Create a collection whose only entry is `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![root.into()],
        }
    }

    /// The directory relative paths are resolved against.
    pub fn base(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Append a search root. Relative paths are taken relative to the first
    /// entry. Returns `false` if the path was already present.
    pub fn push(&mut self, path: impl AsRef<Path>) -> bool {
        let path = self.absolutize(path.as_ref());
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Insert a search root ahead of all others, moving it if present.
    pub fn prepend(&mut self, path: impl AsRef<Path>) {
        let path = self.absolutize(path.as_ref());
        self.paths.retain(|p| p != &path);
        self.paths.insert(0, path);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Find `relative` under the search roots, returning the first match.
    pub fn find(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        let relative = relative.as_ref();
        self.paths
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
    }

    /// Every match for `relative`, in search order.
    pub fn find_all(&self, relative: impl AsRef<Path>) -> Vec<PathBuf> {
        let relative = relative.as_ref();
        self.paths
            .iter()
            .map(|dir| dir.join(relative))
            .filter(|candidate| candidate.is_file())
            .collect()
    }

    fn absolutize(&self, path: &Path) -> PathBuf {
        match self.base() {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_push_resolves_relative_to_root_and_dedups() {
        let mut paths = LoadPaths::from_root("/srv/app");
        assert!(paths.push("shared"));
        assert!(!paths.push("/srv/app/shared"));
        let all: Vec<&Path> = paths.iter().collect();
        assert_eq!(all, vec![Path::new("/srv/app"), Path::new("/srv/app/shared")]);
    }

    #[test]
    fn test_prepend_moves_existing_entry() {
        let mut paths = LoadPaths::from_root("/srv/app");
        paths.push("/srv/vendor");
        paths.prepend("/srv/vendor");
        let all: Vec<&Path> = paths.iter().collect();
        assert_eq!(all, vec![Path::new("/srv/vendor"), Path::new("/srv/app")]);
    }

    #[test]
    fn test_find_is_first_found_wins() {
        let root = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("home")).unwrap();
        fs::create_dir_all(shared.path().join("home")).unwrap();
        fs::write(shared.path().join("home/index.html"), "shared").unwrap();

        let mut paths = LoadPaths::from_root(root.path());
        paths.push(shared.path());
        assert_eq!(
            paths.find("home/index.html"),
            Some(shared.path().join("home/index.html"))
        );

        fs::write(root.path().join("home/index.html"), "root").unwrap();
        assert_eq!(
            paths.find("home/index.html"),
            Some(root.path().join("home/index.html"))
        );
        assert_eq!(paths.find_all("home/index.html").len(), 2);
        assert!(paths.find("missing.html").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = LoadPaths::from_root("/srv/app");
        let mut copy = original.clone();
        copy.push("extra");
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
    }
}
