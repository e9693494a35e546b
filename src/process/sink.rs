//! Destinations for child process output lines.

use std::sync::Mutex;

/// Consumer of child output, called once per line as soon as it is read.
///
/// Sinks are shared between workers when jobs run in parallel, hence `Sync`.
pub trait LineSink: Sync {
    fn line(&self, line: &str);
}

impl<F> LineSink for F
where
    F: Fn(&str) + Sync,
{
    fn line(&self, line: &str) {
        self(line)
    }
}

/// Forwards every line to the `log` facade under the `jythonc` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LineSink for LogSink {
    fn line(&self, line: &str) {
        log::info!(target: "jythonc", "{}", line);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LineSink for NullSink {
    fn line(&self, _line: &str) {}
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LineSink for MemorySink {
    fn line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
