//! jythonc command-line assembly.
//!
//! Every job gets the same prefix:
//!
//! ```text
//! java -cp <home>/jython.jar org.python.util.jython <home>/Tools/jythonc/jythonc.py -i --workdir=<dest>
//! ```
//!
//! followed by the enabled switches (`--deep`, `--core`, `--all`, in that
//! order), `--package a.b` when the file is not in the default package, and
//! finally the source file itself.

use std::fmt;
use std::path::PathBuf;

use super::environment::ToolEnvironment;
use crate::config::CompilerConfig;
use crate::core::CompileJob;

/// Main class of the Jython runtime
pub const JYTHON_MAIN_CLASS: &str = "org.python.util.jython";

/// Suppresses jythonc's deprecation banner
pub const SUPPRESS_DEPRECATION_FLAG: &str = "-i";

/// A fully assembled child process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: ToolEnvironment,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: ToolEnvironment::new(),
        }
    }

    pub fn with_env(mut self, env: ToolEnvironment) -> Self {
        self.env = env;
        self
    }

    /// Program followed by its arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line().join(" "))
    }
}

/// Builds one [`CommandSpec`] per job from the shared run settings.
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    runtime: String,
    prefix: Vec<String>,
    env: ToolEnvironment,
}

impl ArgumentBuilder {
    pub fn new(config: &CompilerConfig, env: ToolEnvironment) -> Self {
        Self {
            runtime: config.runtime.clone(),
            prefix: Self::prefix_args(config),
            env,
        }
    }

    fn prefix_args(config: &CompilerConfig) -> Vec<String> {
        let mut args = vec![
            "-cp".to_string(),
            Self::class_path(config),
            JYTHON_MAIN_CLASS.to_string(),
            config.jythonc_script().display().to_string(),
            SUPPRESS_DEPRECATION_FLAG.to_string(),
            format!("--workdir={}", absolute(&config.dest_root).display()),
        ];

        let flags = config.effective_flags();
        if flags.deep {
            args.push("--deep".to_string());
        }
        if flags.core {
            args.push("--core".to_string());
        }
        if flags.all {
            args.push("--all".to_string());
        }

        args
    }

    fn class_path(config: &CompilerConfig) -> String {
        let jar = config.tool_jar();
        match config.tool_artifact() {
            Some(artifact) => std::env::join_paths([jar.clone(), artifact.path.clone()])
                .map(|cp| cp.to_string_lossy().into_owned())
                .unwrap_or_else(|_| jar.display().to_string()),
            None => jar.display().to_string(),
        }
    }

    /// Assemble the invocation for one job.
    pub fn build(&self, job: &CompileJob<'_>) -> CommandSpec {
        let mut args = self.prefix.clone();

        if let Some(package) = job.package.dotted() {
            args.push("--package".to_string());
            args.push(package);
        }

        args.push(job.source_path().display().to_string());

        CommandSpec::new(self.runtime.clone(), args).with_env(self.env.clone())
    }
}

fn absolute(path: &std::path::Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Full command line for a single job, runtime entry point first.
pub fn build_arguments(job: &CompileJob<'_>) -> Vec<String> {
    ArgumentBuilder::new(job.config, ToolEnvironment::from_config(job.config))
        .build(job)
        .command_line()
}
