//! Package inference from a file's position below the source root.
//!
//! A file directly inside the root belongs to the default package. A file
//! `k` directories below it gets a `k`-segment package made of those
//! directory names, root-adjacent first:
//!
//! ```text
//! <root>/a.py            -> default package
//! <root>/pkg/sub/b.py    -> pkg.sub
//! ```

use std::fmt;
use std::path::{Component, Path};

use super::source::SourceFile;
use crate::errors::{CompileError, Result};

/// Logical package of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Package {
    /// File sits directly in the source root
    Default,
    /// Directory names between the root and the file
    Named(Vec<String>),
}

impl Package {
    pub fn is_default(&self) -> bool {
        matches!(self, Package::Default)
    }

    pub fn segments(&self) -> &[String] {
        match self {
            Package::Default => &[],
            Package::Named(segments) => segments,
        }
    }

    /// Dotted form passed to `--package`, `None` for the default package.
    pub fn dotted(&self) -> Option<String> {
        match self {
            Package::Default => None,
            Package::Named(segments) => Some(segments.join(".")),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Package::Default => write!(f, "<default>"),
            Package::Named(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

/// Compute the package of `file` relative to `root`.
///
/// Both sides are canonicalized first so that trailing separators, `.`/`..`
/// segments and symlinks cannot produce a spurious mismatch.
pub fn resolve_package(file: &SourceFile, root: &Path) -> Result<Package> {
    let canonical_file = file.canonical_path.as_deref().ok_or_else(|| {
        CompileError::path_resolution(&file.absolute_path, "canonical path could not be computed")
    })?;

    let canonical_root = std::fs::canonicalize(root).map_err(|e| {
        CompileError::path_resolution(
            &file.absolute_path,
            format!("cannot canonicalize root {}: {e}", root.display()),
        )
    })?;

    let parent = canonical_file.parent().ok_or_else(|| {
        CompileError::path_resolution(&file.absolute_path, "file has no parent directory")
    })?;

    if parent == canonical_root {
        return Ok(Package::Default);
    }

    let relative = parent.strip_prefix(&canonical_root).map_err(|_| {
        CompileError::path_resolution(
            &file.absolute_path,
            format!("not located under {}", canonical_root.display()),
        )
    })?;

    let segments = relative
        .components()
        .map(|component| match component {
            Component::Normal(name) => name.to_str().map(str::to_owned).ok_or_else(|| {
                CompileError::path_resolution(&file.absolute_path, "directory name is not UTF-8")
            }),
            other => Err(CompileError::path_resolution(
                &file.absolute_path,
                format!("unexpected path component {:?}", other),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Package::Named(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> SourceFile {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        SourceFile::from_path(&path)
    }

    #[test]
    fn test_root_file_has_default_package() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "a.py");
        assert_eq!(resolve_package(&file, temp.path()).unwrap(), Package::Default);
    }

    #[test]
    fn test_nested_file_package_segments() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "pkg/sub/b.py");
        let package = resolve_package(&file, temp.path()).unwrap();
        assert_eq!(package.segments(), ["pkg", "sub"]);
        assert_eq!(package.dotted().as_deref(), Some("pkg.sub"));
    }

    #[test]
    fn test_root_with_dot_segments_still_matches() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "pkg/c.py");
        let odd_root = temp.path().join("pkg").join("..").join(".");
        let package = resolve_package(&file, &odd_root).unwrap();
        assert_eq!(package, Package::Named(vec!["pkg".to_string()]));
    }

    #[test]
    fn test_file_outside_root_is_rejected() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let file = touch(elsewhere.path(), "x/stray.py");

        let err = resolve_package(&file, root.path()).unwrap_err();
        assert!(matches!(err, CompileError::PathResolution { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_uncanonicalizable_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = SourceFile::from_path(&temp.path().join("vanished.py"));
        assert!(resolve_package(&file, temp.path()).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Package::Default.to_string(), "<default>");
        assert_eq!(
            Package::Named(vec!["a".into(), "b".into()]).to_string(),
            "a.b"
        );
    }
}
