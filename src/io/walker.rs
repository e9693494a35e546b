use crate::core::SourceFile;
use crate::errors::{CompileError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Recursive source discovery.
///
/// Every directory is descended into, including directories reached through
/// symlinks; hidden entries and ignore files are not honored. Entries are
/// visited depth-first in file-name order, which keeps the job order stable
/// between runs. Symlink cycles and dangling links are logged and skipped.
pub struct SourceWalker {
    root: PathBuf,
    suffix: String,
    ignore_patterns: Vec<String>,
}

impl SourceWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            suffix: crate::config::DEFAULT_SOURCE_SUFFIX.to_string(),
            ignore_patterns: vec![],
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<SourceFile>> {
        self.walk_paths()
            .map(|paths| paths.iter().map(|p| SourceFile::from_path(p)).collect())
    }

    /// Discovered file paths, without building [`SourceFile`]s.
    pub fn walk_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            let source = ignore::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "scan root is not an existing directory",
            ));
            return Err(self.scan_error(source));
        }

        let patterns = self.compile_patterns()?;
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_skippable(&e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
                Err(e) => return Err(self.scan_error(e)),
            };
            // Links are followed, so this is the type of the target
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());

            if !is_dir && self.should_process(entry.path(), &patterns) {
                files.push(entry.into_path());
            }
        }

        log::debug!(
            "Found {} '{}' files under {}",
            files.len(),
            self.suffix,
            self.root.display()
        );
        Ok(files)
    }

    fn should_process(&self, path: &Path, patterns: &[glob::Pattern]) -> bool {
        let has_suffix = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.suffix))
            .unwrap_or(false);

        if !has_suffix {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !patterns.iter().any(|p| p.matches_path(relative))
    }

    fn compile_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.ignore_patterns
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    CompileError::configuration(
                        "exclude",
                        PathBuf::from(pattern),
                        format!("invalid glob pattern: {e}"),
                    )
                })
            })
            .collect()
    }

    fn scan_error(&self, source: ignore::Error) -> CompileError {
        CompileError::Scan {
            root: self.root.clone(),
            source,
        }
    }
}

/// Symlink cycles and links whose target is gone.
fn is_skippable(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => is_skippable(err),
        ignore::Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
        _ => false,
    }
}

/// Scan `root` for files ending in `suffix`.
pub fn scan_sources(root: &Path, suffix: &str) -> Result<Vec<SourceFile>> {
    SourceWalker::new(root.to_path_buf())
        .with_suffix(suffix)
        .walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directories_with_suffix_are_not_yielded() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("weird.py")).unwrap();
        fs::write(temp.path().join("weird.py").join("inner.py"), "").unwrap();

        let files = SourceWalker::new(temp.path().to_path_buf())
            .walk_paths()
            .unwrap();
        assert_eq!(files, vec![temp.path().join("weird.py").join("inner.py")]);
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let err = SourceWalker::new(temp.path().to_path_buf())
            .with_ignore_patterns(vec!["[".to_string()])
            .walk_paths()
            .unwrap_err();
        assert!(matches!(err, CompileError::Configuration { .. }));
    }

    #[test]
    fn test_exclude_matches_relative_to_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tests").join("src");
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(root.join("keep.py"), "").unwrap();
        fs::write(root.join("tests").join("skip.py"), "").unwrap();

        let files = SourceWalker::new(root.clone())
            .with_ignore_patterns(vec!["**/tests/**".to_string()])
            .walk_paths()
            .unwrap();
        assert_eq!(files, vec![root.join("keep.py")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlinks_are_descended() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.py"), "").unwrap();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real").join("b.py"), "").unwrap();
        symlink(root.join("real"), root.join("linked")).unwrap();
        fs::write(outside.path().join("c.py"), "").unwrap();
        symlink(outside.path(), root.join("weird.py")).unwrap();

        let files = SourceWalker::new(root.to_path_buf()).walk_paths().unwrap();

        assert_eq!(
            files,
            vec![
                root.join("a.py"),
                root.join("linked").join("b.py"),
                root.join("real").join("b.py"),
                root.join("weird.py").join("c.py"),
            ]
        );
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_and_dangling_link_are_skipped() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::write(root.join("pkg").join("mod.py"), "").unwrap();
        symlink(root, root.join("pkg").join("back")).unwrap();
        symlink(root.join("gone"), root.join("dangling.py")).unwrap();

        let files = SourceWalker::new(root.to_path_buf()).walk_paths().unwrap();
        assert_eq!(files, vec![root.join("pkg").join("mod.py")]);
    }

    #[test]
    fn test_missing_root_is_scan_error() {
        let temp = TempDir::new().unwrap();
        let err = scan_sources(&temp.path().join("nope"), ".py").unwrap_err();
        assert!(matches!(err, CompileError::Scan { .. }));
    }
}
