//! Compilation pipeline.
//!
//! 1. Validate the directory parameters (fatal on failure)
//! 2. Build the child environment once
//! 3. Discover sources under the root (fatal on failure)
//! 4. For each file: resolve package, assemble the command, run jythonc
//! 5. Aggregate every per-file outcome into a [`PipelineResult`]

pub mod executor;
pub mod result;

pub use executor::{compile, worker_count, CompilePipeline};
pub use result::{JobOutcome, JobReport, PipelineResult};
