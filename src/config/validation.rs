//! Sanity checks on run parameters, performed before any file is touched.

use std::fs;
use std::path::Path;

use super::core::CompilerConfig;
use crate::errors::{CompileError, Result};

/// Ensure a supplied parameter names a readable directory.
pub fn check_valid_directory(name: &str, value: &Path) -> Result<()> {
    let metadata = fs::metadata(value)
        .map_err(|e| CompileError::configuration(name, value, format!("cannot stat: {e}")))?;

    if !metadata.is_dir() {
        return Err(CompileError::configuration(name, value, "not a directory"));
    }

    fs::read_dir(value)
        .map_err(|e| CompileError::configuration(name, value, format!("unreadable: {e}")))?;

    Ok(())
}

/// Validate the directory inputs of a run.
///
/// `dest_root` is not checked; jythonc creates it.
pub fn validate_config(config: &CompilerConfig) -> Result<()> {
    check_valid_directory("sourceDir", &config.source_root)?;
    check_valid_directory("jythonHome", &config.tool_home)?;
    Ok(())
}
