#![allow(dead_code)]

use jythonc_driver::{
    CommandRunner, CommandSpec, CompileError, CompilerConfig, LineSink, ProcessResult, RunControl,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// A source root, an output directory and a fake Jython home in one temp dir.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::create_dir_all(dir.path().join("jython/Tools/jythonc")).unwrap();
        Self { dir }
    }

    pub fn source_root(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn dest_root(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn jython_home(&self) -> PathBuf {
        self.dir.path().join("jython")
    }

    /// Create `relative` (and its parents) under the source root.
    pub fn add_source(&self, relative: &str) -> PathBuf {
        let path = self.source_root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "print 'hello'\n").unwrap();
        path
    }

    pub fn config(&self) -> CompilerConfig {
        CompilerConfig::new(self.source_root(), self.dest_root(), self.jython_home())
    }
}

/// Records every command and answers from a script keyed by call order.
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    respond: Box<dyn Fn(usize, &CommandSpec) -> Result<ProcessResult, CompileError> + Send + Sync>,
}

impl RecordingRunner {
    /// Every invocation exits 0 after printing one line.
    pub fn succeeding() -> Self {
        Self::with(|_, spec| {
            let name = spec.args.last().cloned().unwrap_or_default();
            Ok(ProcessResult::new(0, vec![format!("compiled {name}")]))
        })
    }

    pub fn with<F>(respond: F) -> Self
    where
        F: Fn(usize, &CommandSpec) -> Result<ProcessResult, CompileError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        command: &CommandSpec,
        sink: &dyn LineSink,
        _control: &RunControl,
    ) -> Result<ProcessResult, CompileError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(command.clone());
            calls.len() - 1
        };
        let result = (self.respond)(index, command)?;
        for line in &result.captured_output {
            sink.line(line);
        }
        Ok(result)
    }
}

/// Last argument of a jythonc invocation is the source file.
pub fn source_arg(spec: &CommandSpec) -> &Path {
    Path::new(spec.args.last().map(String::as_str).unwrap_or_default())
}

/// Value following `--package`, if present.
pub fn package_arg(spec: &CommandSpec) -> Option<&str> {
    spec.args
        .iter()
        .position(|a| a == "--package")
        .and_then(|i| spec.args.get(i + 1))
        .map(String::as_str)
}

/// Write an executable shell script that stands in for the Java runtime.
#[cfg(unix)]
pub fn fake_runtime(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-java");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
