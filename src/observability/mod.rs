//! Crash-report context for compilation runs.
//!
//! Install the panic hook at application startup:
//!
//! ```ignore
//! use jythonc_driver::observability::install_panic_hook;
//!
//! fn main() {
//!     install_panic_hook();
//!     // ...
//! }
//! ```
//!
//! The pipeline tracks its own phase and current file:
//!
//! ```ignore
//! let _phase = set_phase(RunPhase::Compilation);
//! for file in files {
//!     let _file_guard = set_current_file(&file);
//!     // a panic here reports the phase and the file
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_progress, set_current_command,
    set_current_file, set_current_package, set_phase, set_progress, ContextGuard, RunContext, RunPhase,
};
pub use panic_hook::install_panic_hook;
