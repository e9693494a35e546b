//! Thread-local context tracking for crash reports.
//!
//! Records which phase of a run is active and which source file is being
//! compiled. Uses thread-local storage for per-thread context (works with
//! the rayon worker pool) and atomic counters for global progress.
//!
//! ## Thread Safety
//!
//! - Thread-local context: Each thread has its own context (via `thread_local!`)
//! - Global progress: Atomic counters for files processed/total
//! - Context guards use RAII for automatic cleanup on drop

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Global progress counters
static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<RunContext> = const { RefCell::new(RunContext::new()) };
}

/// What the driver was doing when something went wrong.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub phase: Option<RunPhase>,
    /// Source file currently being compiled
    pub current_file: Option<PathBuf>,
    /// Package resolved for the current file
    pub current_package: Option<String>,
    /// jythonc command line in flight
    pub current_command: Option<String>,
}

impl RunContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_package: None,
            current_command: None,
        }
    }
}

/// Stages of a compilation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Checking directory parameters
    Validation,
    /// Walking the source tree
    Discovery,
    /// Running jythonc over the discovered files
    Compilation,
    /// Summarizing per-file outcomes
    Reporting,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Discovery => write!(f, "discovery"),
            Self::Compilation => write!(f, "compilation"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

/// RAII guard for restoring the run context on drop.
///
/// When the guard is dropped, it restores the previous context,
/// so a file guard nests inside a phase guard.
pub struct ContextGuard {
    previous: RunContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current run phase.
///
/// Returns a guard that restores the previous phase on drop.
///
/// # Example
///
/// ```ignore
/// let _phase = set_phase(RunPhase::Discovery);
/// // Walk the tree...
/// // Phase automatically restored when _phase drops
/// ```
#[must_use]
pub fn set_phase(phase: RunPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the source file currently being compiled.
///
/// Returns a guard that restores the previous file on drop.
///
/// # Example
///
/// ```ignore
/// for file in files {
///     let _file_guard = set_current_file(&file);
///     compile(&file)?;
///     // File context restored when _file_guard drops
/// }
/// ```
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

/// Record the package resolved for the current file.
///
/// Returns a guard that restores the previous package on drop.
#[must_use]
pub fn set_current_package(package: impl Into<String>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_package = Some(package.into());
        ContextGuard { previous }
    })
}

/// Record the command line being run for the current file.
#[must_use]
pub fn set_current_command(command: impl Into<String>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_command = Some(command.into());
        ContextGuard { previous }
    })
}

/// Set the progress counters (compiled and total files).
///
/// Thread-safe; can be called from any thread.
pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

/// Increment the processed file count.
///
/// Thread-safe; called from pool workers.
pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

/// Get the current context snapshot.
///
/// Called by the panic hook to include context in crash reports.
#[must_use]
pub fn get_current_context() -> RunContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Get the current progress (processed, total).
///
/// Called by the panic hook to show progress in crash reports.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

/// Reset progress counters to zero.
///
/// Called at the start of every run.
pub fn reset_progress() {
    FILES_PROCESSED.store(0, Ordering::Relaxed);
    FILES_TOTAL.store(0, Ordering::Relaxed);
}

/// Reset the current thread's context to empty.
///
/// Useful for testing.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = RunContext::new();
    });
}
