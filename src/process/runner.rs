//! Child process execution with merged, line-streamed output.
//!
//! stdout and stderr are read on two reader threads and funnelled through
//! one channel, so the caller sees a single interleaved sequence in arrival
//! order. Each line reaches the [`LineSink`] as soon as it is read; nothing
//! waits for the child to finish before being displayed.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::cancel::CancellationToken;
use super::result::{ProcessResult, SIGNAL_EXIT_CODE};
use super::sink::LineSink;
use crate::command::CommandSpec;
use crate::errors::{CompileError, Result};

/// How often timeouts and cancellation are re-checked while a child runs
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Per-invocation limits.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn is_bounded(&self) -> bool {
        self.timeout.is_some() || self.cancellation.is_some()
    }
}

/// Executes one assembled command.
///
/// A non-zero exit status is returned inside [`ProcessResult`], not as an
/// error; only launch, read, timeout and cancellation failures are errors.
pub trait CommandRunner: Sync {
    fn run(
        &self,
        command: &CommandSpec,
        sink: &dyn LineSink,
        control: &RunControl,
    ) -> Result<ProcessResult>;
}

/// Runs commands as real operating system processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &CommandSpec,
        sink: &dyn LineSink,
        control: &RunControl,
    ) -> Result<ProcessResult> {
        let program = resolve_program(&command.program)?;

        let mut child = Command::new(&program)
            .args(&command.args)
            .envs(command.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompileError::launch(&command.program, e))?;

        log::trace!("Spawned '{}' as pid {}", command.program, child.id());

        let (tx, rx) = channel::unbounded();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, tx.clone());
        }
        drop(tx);

        let deadline = control.timeout.map(|t| Instant::now() + t);
        let captured = match pump_lines(&rx, sink, control, deadline, &command.program) {
            Ok(captured) => captured,
            Err(e) => {
                terminate(&mut child);
                return Err(e);
            }
        };

        let status = wait_for_exit(&mut child, control, deadline, &command.program)?;
        Ok(ProcessResult::new(exit_code(status), captured))
    }
}

/// Run `command` with a [`SystemRunner`] and no limits.
pub fn run_command(command: &CommandSpec, sink: &dyn LineSink) -> Result<ProcessResult> {
    SystemRunner::new().run(command, sink, &RunControl::default())
}

/// Locate the executable on the search path unless a path was given.
fn resolve_program(program: &str) -> Result<PathBuf> {
    if Path::new(program).components().count() > 1 {
        return Ok(PathBuf::from(program));
    }

    which::which(program).map_err(|e| {
        CompileError::launch(program, io::Error::new(io::ErrorKind::NotFound, e.to_string()))
    })
}

fn spawn_reader<R>(stream: R, tx: Sender<io::Result<String>>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(decode_line(&buf))).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
}

fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Forward lines until both streams close, or a limit trips.
fn pump_lines(
    rx: &Receiver<io::Result<String>>,
    sink: &dyn LineSink,
    control: &RunControl,
    deadline: Option<Instant>,
    program: &str,
) -> Result<Vec<String>> {
    let mut captured = Vec::new();

    loop {
        check_limits(control, deadline, program)?;

        let wait = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()).min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        };

        match rx.recv_timeout(wait) {
            Ok(Ok(line)) => {
                sink.line(&line);
                captured.push(line);
            }
            Ok(Err(e)) => return Err(CompileError::process_io(program, e)),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Ok(captured),
        }
    }
}

fn check_limits(control: &RunControl, deadline: Option<Instant>, program: &str) -> Result<()> {
    if control.is_cancelled() {
        return Err(CompileError::Cancelled {
            program: program.to_string(),
        });
    }

    if let (Some(deadline), Some(timeout)) = (deadline, control.timeout) {
        if Instant::now() >= deadline {
            return Err(CompileError::Timeout {
                program: program.to_string(),
                after: timeout,
            });
        }
    }

    Ok(())
}

fn wait_for_exit(
    child: &mut Child,
    control: &RunControl,
    deadline: Option<Instant>,
    program: &str,
) -> Result<ExitStatus> {
    if !control.is_bounded() {
        return child
            .wait()
            .map_err(|e| CompileError::process_io(program, e));
    }

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => return Err(CompileError::process_io(program, e)),
        }

        if let Err(e) = check_limits(control, deadline, program) {
            terminate(child);
            return Err(e);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn terminate(child: &mut Child) {
    // Already exited is fine
    let _ = child.kill();
    let _ = child.wait();
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SIGNAL_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::NullSink;

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"hello\n"), "hello");
        assert_eq!(decode_line(b"dos\r\n"), "dos");
        assert_eq!(decode_line(b"no newline"), "no newline");
        assert_eq!(decode_line(b"bad \xff byte\n"), "bad \u{fffd} byte");
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let spec = CommandSpec::new("definitely-not-a-real-runtime-4711", vec![]);
        let err = run_command(&spec, &NullSink).unwrap_err();
        assert!(err.is_launch_error());
    }

    #[test]
    fn test_run_control_cancellation() {
        let token = CancellationToken::new();
        let control = RunControl::new().with_cancellation(token.clone());
        assert!(!control.is_cancelled());
        token.cancel();
        assert!(control.is_cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_reported_without_error() {
        let spec = CommandSpec::new("sh", vec!["-c".into(), "exit 7".into()]);
        let result = run_command(&spec, &NullSink).unwrap();
        assert_eq!(result.exit_code, 7);
        assert!(result.captured_output.is_empty());
    }
}
