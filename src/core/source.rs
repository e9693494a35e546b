use std::path::{Path, PathBuf};

/// A source file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub absolute_path: PathBuf,
    /// Symlink-resolved path; `None` when canonicalization failed
    pub canonical_path: Option<PathBuf>,
    pub parent_directory: PathBuf,
}

impl SourceFile {
    /// Build from a discovered path, resolving it against the current
    /// directory when relative.
    pub fn from_path(path: &Path) -> Self {
        let absolute_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let canonical_path = std::fs::canonicalize(path).ok();
        let parent_directory = absolute_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            absolute_path,
            canonical_path,
            parent_directory,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.absolute_path.file_name().and_then(|n| n.to_str())
    }

    /// Path handed to jythonc: the canonical path when known.
    pub fn compile_path(&self) -> &Path {
        self.canonical_path
            .as_deref()
            .unwrap_or(&self.absolute_path)
    }
}
