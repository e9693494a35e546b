//! Build-time driver for jythonc.
//!
//! Discovers Jython sources under a root directory, infers each file's Java
//! package from its directory position, and runs jythonc once per file,
//! streaming the compiler's output and collecting every per-file outcome.
//!
//! ```rust,no_run
//! use jythonc_driver::{compile, CompilerConfig};
//!
//! let config = CompilerConfig::new("src/main/jython", "target/classes", "/opt/jython");
//! let result = compile(&config)?;
//! assert!(result.is_success(), "{}", result);
//! # Ok::<(), jythonc_driver::CompileError>(())
//! ```

// Export modules for library usage
pub mod cli;
pub mod command;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod process;

// Re-export commonly used types
pub use crate::command::{build_arguments, ArgumentBuilder, CommandSpec, ToolEnvironment};
pub use crate::config::{Artifact, CompileFlags, CompilerConfig, FlagPolicy};
pub use crate::core::{resolve_package, CompileJob, Package, SourceFile};
pub use crate::errors::{CompileError, ErrorCode, Result};
pub use crate::io::{scan_sources, SourceWalker};
pub use crate::pipeline::{compile, CompilePipeline, JobOutcome, JobReport, PipelineResult};
pub use crate::process::{
    run_command, CancellationToken, CommandRunner, LineSink, LogSink, MemorySink, ProcessResult,
    RunControl, SystemRunner,
};
