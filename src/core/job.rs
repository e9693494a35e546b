use std::path::Path;

use super::package::{resolve_package, Package};
use super::source::SourceFile;
use crate::config::CompilerConfig;
use crate::errors::Result;

/// One compilation unit: a source file, its package and the run settings.
///
/// Built just before invocation and dropped once the job completes.
#[derive(Debug, Clone)]
pub struct CompileJob<'a> {
    pub file: SourceFile,
    pub package: Package,
    pub config: &'a CompilerConfig,
}

impl<'a> CompileJob<'a> {
    pub fn new(file: SourceFile, package: Package, config: &'a CompilerConfig) -> Self {
        Self {
            file,
            package,
            config,
        }
    }

    /// Resolve the file's package against the configured source root.
    pub fn resolve(file: SourceFile, config: &'a CompilerConfig) -> Result<Self> {
        let package = resolve_package(&file, &config.source_root)?;
        log::debug!("Discovered the package: {}", package);
        Ok(Self::new(file, package, config))
    }

    /// Absolute path of the file handed to jythonc.
    pub fn source_path(&self) -> &Path {
        self.file.compile_path()
    }
}
