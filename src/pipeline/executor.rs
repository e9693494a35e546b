//! Drives a whole run: validate, scan, then one jythonc process per file.
//!
//! jythonc cannot reliably infer per-file packages when handed files from
//! several packages at once, so each file gets its own invocation with an
//! explicit `--package`. A failing file never stops the run; every file is
//! attempted and recorded.

use rayon::prelude::*;

use super::result::{JobOutcome, JobReport, PipelineResult};
use crate::command::{ArgumentBuilder, ToolEnvironment};
use crate::config::{validate_config, CompilerConfig};
use crate::core::{CompileJob, SourceFile};
use crate::errors::Result;
use crate::io::SourceWalker;
use crate::observability::{
    increment_processed, reset_progress, set_current_command, set_current_file,
    set_current_package, set_phase, set_progress, RunPhase,
};
use crate::process::{
    CancellationToken, CommandRunner, LineSink, LogSink, RunControl, SystemRunner,
};

/// Number of workers for a `jobs` setting; 0 means available parallelism.
pub fn worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}

pub struct CompilePipeline<R = SystemRunner> {
    runner: R,
    cancellation: Option<CancellationToken>,
}

impl Default for CompilePipeline<SystemRunner> {
    fn default() -> Self {
        Self::new(SystemRunner::new())
    }
}

impl<R: CommandRunner> CompilePipeline<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            cancellation: None,
        }
    }

    /// Stop scheduling jobs and kill in-flight children once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run with child output forwarded to the `log` facade.
    pub fn execute(&self, config: &CompilerConfig) -> Result<PipelineResult> {
        self.execute_with_sink(config, &LogSink)
    }

    /// Run with child output forwarded to `sink`.
    ///
    /// Configuration and scan failures are returned as errors before any
    /// process starts. Everything after that is recorded per file.
    pub fn execute_with_sink(
        &self,
        config: &CompilerConfig,
        sink: &dyn LineSink,
    ) -> Result<PipelineResult> {
        reset_progress();

        {
            let _phase = set_phase(RunPhase::Validation);
            validate_config(config)?;
        }

        let files = {
            let _phase = set_phase(RunPhase::Discovery);
            SourceWalker::new(config.source_root.clone())
                .with_suffix(config.source_suffix.clone())
                .with_ignore_patterns(config.exclude.clone())
                .walk()?
        };
        set_progress(0, files.len());
        log::info!(
            "Compiling {} Jython source file(s) from {}",
            files.len(),
            config.source_root.display()
        );

        let builder = ArgumentBuilder::new(config, ToolEnvironment::from_config(config));
        let mut control = RunControl::new().with_timeout(config.timeout);
        if let Some(token) = &self.cancellation {
            control = control.with_cancellation(token.clone());
        }

        let reports = {
            let _phase = set_phase(RunPhase::Compilation);
            self.compile_all(files, config, &builder, sink, &control)
        };

        let _phase = set_phase(RunPhase::Reporting);
        let result = PipelineResult::new(reports, control.is_cancelled());
        if result.is_success() {
            log::info!("{}", result);
        } else {
            log::warn!("{}", result);
        }
        Ok(result)
    }

    fn compile_all(
        &self,
        files: Vec<SourceFile>,
        config: &CompilerConfig,
        builder: &ArgumentBuilder,
        sink: &dyn LineSink,
        control: &RunControl,
    ) -> Vec<JobReport> {
        let workers = worker_count(config.jobs);
        let compile = |file: SourceFile| self.compile_file(file, config, builder, sink, control);

        if workers <= 1 || files.len() <= 1 {
            return files.into_iter().map(compile).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => {
                log::debug!("Compiling on {} workers", workers);
                pool.install(|| files.into_par_iter().map(compile).collect())
            }
            Err(e) => {
                log::warn!("Cannot start worker pool ({}); compiling sequentially", e);
                files.into_iter().map(compile).collect()
            }
        }
    }

    fn compile_file(
        &self,
        file: SourceFile,
        config: &CompilerConfig,
        builder: &ArgumentBuilder,
        sink: &dyn LineSink,
        control: &RunControl,
    ) -> JobReport {
        let path = file.absolute_path.clone();

        if control.is_cancelled() {
            return JobReport::new(path, None, JobOutcome::Skipped);
        }

        let _file = set_current_file(&path);
        let report = match CompileJob::resolve(file, config) {
            Ok(job) => self.run_job(&job, builder, sink, control),
            Err(e) => {
                log::warn!("{}", e);
                JobReport::new(path, None, JobOutcome::Failed(e))
            }
        };

        increment_processed();
        report
    }

    fn run_job(
        &self,
        job: &CompileJob<'_>,
        builder: &ArgumentBuilder,
        sink: &dyn LineSink,
        control: &RunControl,
    ) -> JobReport {
        let _package = set_current_package(job.package.to_string());
        let command = builder.build(job);
        let _command = set_current_command(command.to_string());
        log::debug!("Command executed: {}", command);

        let outcome = match self.runner.run(&command, sink, control) {
            Ok(result) => {
                log::debug!("jythonc exit status: {}", result.exit_code);
                if !result.success() {
                    log::warn!(
                        "jythonc exited with status {} for {}",
                        result.exit_code,
                        job.file.absolute_path.display()
                    );
                }
                JobOutcome::Completed(result)
            }
            Err(e) => {
                log::warn!("{} ({})", e, job.file.absolute_path.display());
                JobOutcome::Failed(e)
            }
        };

        JobReport::new(
            job.file.absolute_path.clone(),
            Some(job.package.clone()),
            outcome,
        )
    }
}

/// Run the full pipeline with real processes and log-forwarded output.
pub fn compile(config: &CompilerConfig) -> Result<PipelineResult> {
    CompilePipeline::default().execute(config)
}
