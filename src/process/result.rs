/// Exit code recorded when the child was terminated by a signal
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Outcome of one finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    /// Combined stdout/stderr lines in arrival order
    pub captured_output: Vec<String>,
}

impl ProcessResult {
    pub fn new(exit_code: i32, captured_output: Vec<String>) -> Self {
        Self {
            exit_code,
            captured_output,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
