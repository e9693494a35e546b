//! Error types for the jythonc compilation driver.
//!
//! Errors fall into two groups:
//!
//! - **Fatal**: `Configuration` and `Scan` abort the run before any process
//!   is spawned. No useful partial work is possible without a valid tree.
//! - **Per-file**: `PathResolution`, `ProcessLaunch`, `ProcessIo`, `Timeout`
//!   and `Cancelled` are recorded against a single job and the pipeline
//!   moves on to the next file.
//!
//! A non-zero exit status from jythonc is *not* an error. It is carried in
//! [`ProcessResult`](crate::process::ProcessResult) for the caller to judge.
//!
//! # Example
//!
//! ```rust
//! use jythonc_driver::errors::{CompileError, ErrorCode};
//!
//! let err = CompileError::configuration("sourceDir", "/missing", "does not exist");
//! assert!(err.is_fatal());
//! assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_DIRECTORY);
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
///
/// - E001-E009: configuration errors
/// - E010-E019: source discovery errors
/// - E020-E029: package resolution errors
/// - E030-E039: process errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Configuration error - directory missing, not a directory or unreadable
    pub const CONFIG_INVALID_DIRECTORY: ErrorCode = ErrorCode("E001");
    /// Configuration error - config file could not be read or parsed
    pub const CONFIG_FILE: ErrorCode = ErrorCode("E002");

    /// Scan error - source root could not be traversed
    pub const SCAN_TRAVERSAL: ErrorCode = ErrorCode("E010");

    /// Resolution error - file outside the source root or not canonicalizable
    pub const RESOLUTION_PATH: ErrorCode = ErrorCode("E020");

    /// Process error - executable could not be started
    pub const PROCESS_LAUNCH: ErrorCode = ErrorCode("E030");
    /// Process error - reading combined output failed
    pub const PROCESS_IO: ErrorCode = ErrorCode("E031");
    /// Process error - per-job timeout elapsed
    pub const PROCESS_TIMEOUT: ErrorCode = ErrorCode("E032");
    /// Process error - run was cancelled while the job was in flight
    pub const PROCESS_CANCELLED: ErrorCode = ErrorCode("E033");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for driver operations
#[derive(Debug, Error)]
pub enum CompileError {
    /// A required directory input is missing, not a directory, or unreadable
    #[error("'{name}' is not a valid directory: {} ({reason})", path.display())]
    Configuration {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// A configuration file could not be loaded
    #[error("Failed to load config file {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// The source root cannot be traversed
    #[error("Failed to scan {}: {source}", root.display())]
    Scan {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// A discovered file does not sit under the source root, or its
    /// canonical path cannot be computed
    #[error("Cannot resolve package for {}: {reason}", file.display())]
    PathResolution { file: PathBuf, reason: String },

    /// The external compiler process could not be started
    #[error("Failed to launch '{program}': {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading the child's combined output failed before end of stream
    #[error("Failed to read output of '{program}': {source}")]
    ProcessIo {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child exceeded the per-job timeout and was killed
    #[error("'{program}' timed out after {}s", after.as_secs_f64())]
    Timeout { program: String, after: Duration },

    /// The run was cancelled while the child was running
    #[error("'{program}' was cancelled")]
    Cancelled { program: String },
}

impl CompileError {
    pub fn configuration(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            name: name.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn path_resolution(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PathResolution {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Self::ProcessLaunch {
            program: program.into(),
            source,
        }
    }

    pub fn process_io(program: impl Into<String>, source: io::Error) -> Self {
        Self::ProcessIo {
            program: program.into(),
            source,
        }
    }

    /// Get the structured error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::CONFIG_INVALID_DIRECTORY,
            Self::ConfigFile { .. } => ErrorCode::CONFIG_FILE,
            Self::Scan { .. } => ErrorCode::SCAN_TRAVERSAL,
            Self::PathResolution { .. } => ErrorCode::RESOLUTION_PATH,
            Self::ProcessLaunch { .. } => ErrorCode::PROCESS_LAUNCH,
            Self::ProcessIo { .. } => ErrorCode::PROCESS_IO,
            Self::Timeout { .. } => ErrorCode::PROCESS_TIMEOUT,
            Self::Cancelled { .. } => ErrorCode::PROCESS_CANCELLED,
        }
    }

    /// Fatal errors abort the whole run; the rest are recorded per file.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::ConfigFile { .. } | Self::Scan { .. }
        )
    }

    /// True when the failure happened before or while starting the child.
    #[must_use]
    pub fn is_launch_error(&self) -> bool {
        matches!(self, Self::ProcessLaunch { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let config = CompileError::configuration("jythonHome", "/nope", "does not exist");
        assert!(config.is_fatal());

        let resolution = CompileError::path_resolution("/a/b.py", "outside root");
        assert!(!resolution.is_fatal());

        let launch = CompileError::launch("java", io::Error::from(io::ErrorKind::NotFound));
        assert!(!launch.is_fatal());
        assert!(launch.is_launch_error());
    }

    #[test]
    fn test_error_codes_by_category() {
        assert_eq!(
            CompileError::path_resolution("x.py", "r").code().as_str(),
            "E020"
        );
        assert_eq!(
            CompileError::process_io("java", io::Error::other("broken pipe"))
                .code()
                .to_string(),
            "E031"
        );
        assert_eq!(
            CompileError::Timeout {
                program: "java".into(),
                after: Duration::from_secs(2),
            }
            .code(),
            ErrorCode::PROCESS_TIMEOUT
        );
    }

    #[test]
    fn test_configuration_message_names_parameter() {
        let err = CompileError::configuration("sourceDir", "/src/jython", "not a directory");
        let message = err.to_string();
        assert!(message.contains("'sourceDir'"));
        assert!(message.contains("/src/jython"));
        assert!(message.contains("not a directory"));
    }
}
