//! Crash report printed when the driver panics.
//!
//! The report names the run phase, the file and package being compiled,
//! the jythonc command line in flight, and how far the run got. A failing
//! build usually points at one source file, so that is what gets reported.

use super::context::{get_current_context, get_progress, RunContext};
use std::fmt::Write;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest command line echoed in a report, in characters
const MAX_COMMAND_CHARS: usize = 400;

/// Install the crash report hook. Call once at startup.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let report = render_report(
            &panic_message(info),
            location.as_deref(),
            &get_current_context(),
            get_progress(),
        );
        eprintln!("{report}");

        if std::env::var_os("RUST_BACKTRACE").is_some() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        } else {
            eprintln!("Run with RUST_BACKTRACE=1 for a stack trace.");
        }
    }));
}

fn render_report(
    message: &str,
    location: Option<&str>,
    context: &RunContext,
    (processed, total): (usize, usize),
) -> String {
    let mut out = String::new();
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "\njythonc-driver {VERSION} crashed ({}, {timestamp})",
        std::env::consts::OS
    );
    let _ = writeln!(out, "  panic:    {message}");
    if let Some(location) = location {
        let _ = writeln!(out, "  at:       {location}");
    }

    match context.phase {
        Some(phase) => {
            let _ = writeln!(out, "  phase:    {phase}");
        }
        None => {
            let _ = writeln!(out, "  phase:    (before the run started)");
        }
    }
    if let Some(file) = &context.current_file {
        let _ = writeln!(out, "  file:     {}", file.display());
    }
    if let Some(package) = &context.current_package {
        let _ = writeln!(out, "  package:  {package}");
    }
    if let Some(command) = &context.current_command {
        let _ = writeln!(out, "  command:  {}", truncate(command, MAX_COMMAND_CHARS));
    }
    if total > 0 {
        let _ = writeln!(out, "  progress: {processed} of {total} files compiled");
    }

    out
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Shorten to at most `max_chars` characters, cutting on a char boundary.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
    format!("{}...", &s[..end])
}
