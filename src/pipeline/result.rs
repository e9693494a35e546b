//! Per-file outcomes and the aggregate result of one run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::Package;
use crate::errors::CompileError;
use crate::process::ProcessResult;

/// What happened to one discovered file.
#[derive(Debug)]
pub enum JobOutcome {
    /// jythonc ran to completion, with whatever exit code it chose
    Completed(ProcessResult),
    /// Resolution, launch, read, timeout or cancellation failure
    Failed(CompileError),
    /// Never attempted because the run was cancelled first
    Skipped,
}

/// Outcome of one discovered file, in scan order.
#[derive(Debug)]
pub struct JobReport {
    pub file: PathBuf,
    /// `None` when the package could not be resolved
    pub package: Option<Package>,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn new(file: impl Into<PathBuf>, package: Option<Package>, outcome: JobOutcome) -> Self {
        Self {
            file: file.into(),
            package,
            outcome,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Compiled with a zero exit code.
    pub fn succeeded(&self) -> bool {
        matches!(&self.outcome, JobOutcome::Completed(result) if result.success())
    }

    pub fn process_result(&self) -> Option<&ProcessResult> {
        match &self.outcome {
            JobOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CompileError> {
        match &self.outcome {
            JobOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, JobOutcome::Skipped)
    }
}

/// Aggregate of every per-file outcome of a run.
#[derive(Debug, Default)]
pub struct PipelineResult {
    reports: Vec<JobReport>,
    cancelled: bool,
}

impl PipelineResult {
    pub fn new(reports: Vec<JobReport>, cancelled: bool) -> Self {
        Self { reports, cancelled }
    }

    pub fn reports(&self) -> &[JobReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<JobReport> {
        self.reports
    }

    /// Every file compiled with exit code zero and nothing was cancelled.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.reports.iter().all(JobReport::succeeded)
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Reports that ran or were attempted and did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &JobReport> {
        self.reports
            .iter()
            .filter(|r| !r.succeeded() && !r.is_skipped())
    }

    /// Errors raised before or while starting a child process.
    pub fn launch_errors(&self) -> impl Iterator<Item = &CompileError> {
        self.reports
            .iter()
            .filter_map(JobReport::error)
            .filter(|e| e.is_launch_error())
    }

    pub fn process_results(&self) -> impl Iterator<Item = &ProcessResult> {
        self.reports.iter().filter_map(JobReport::process_result)
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded_count(&self) -> usize {
        self.reports.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_skipped()).count()
    }
}

impl fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} compiled, {} failed, {} skipped",
            self.total(),
            self.succeeded_count(),
            self.failed_count(),
            self.skipped_count()
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
