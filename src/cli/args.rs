use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Artifact, CompileFlags, CompilerConfig, FileConfig, FlagPolicy};

#[derive(Parser, Debug, Clone)]
#[command(name = "jythonc-driver")]
#[command(about = "Compile a tree of Jython sources with jythonc, one process per file")]
#[command(version)]
pub struct Cli {
    /// Root of the Jython source tree
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory jythonc writes its output to
    #[arg(long, value_name = "DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Path to a Jython installation
    #[arg(long, value_name = "DIR")]
    pub jython_home: Option<PathBuf>,

    /// Compile all Python dependencies of each module
    #[arg(long)]
    pub deep: bool,

    /// Include the core Jython libraries
    #[arg(long)]
    pub core: bool,

    /// Include all of the Jython libraries
    #[arg(long)]
    pub all: bool,

    /// Expand --all into --core and --core into --deep
    #[arg(long)]
    pub implied_flags: bool,

    /// Suffix identifying source files
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Glob pattern of source paths to skip (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Runtime executable used to start jythonc
    #[arg(long, value_name = "PROGRAM")]
    pub runtime: Option<String>,

    /// Build dependency as ID=PATH (repeatable); the `jython` entry joins the class path
    #[arg(long, value_name = "ID=PATH", value_parser = Artifact::parse)]
    pub artifact: Vec<Artifact>,

    /// Number of concurrent jythonc processes (0 = all cores)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Kill a jythonc process that runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Configuration file (defaults to the nearest .jythonc.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Required parameter that was given neither on the command line nor in
/// the config file.
#[derive(Debug, thiserror::Error)]
#[error("missing required parameter --{0} (or `{1}` in the config file)")]
pub struct MissingParameter(pub &'static str, pub &'static str);

impl Cli {
    /// Merge command-line values over config file values.
    pub fn into_config(self, file: FileConfig) -> Result<CompilerConfig, MissingParameter> {
        let source_dir = self
            .source_dir
            .or(file.source_dir)
            .ok_or(MissingParameter("source-dir", "source_dir"))?;
        let dest_dir = self
            .dest_dir
            .or(file.dest_dir)
            .ok_or(MissingParameter("dest-dir", "dest_dir"))?;
        let jython_home = self
            .jython_home
            .or(file.jython_home)
            .ok_or(MissingParameter("jython-home", "jython_home"))?;

        let file_flags = file.flags.unwrap_or_default();
        let flags = CompileFlags {
            deep: self.deep || file_flags.deep,
            core: self.core || file_flags.core,
            all: self.all || file_flags.all,
        };

        let flag_policy = if self.implied_flags {
            FlagPolicy::Implied
        } else {
            file.flag_policy.unwrap_or_default()
        };

        let exclude = if self.exclude.is_empty() {
            file.exclude.unwrap_or_default()
        } else {
            self.exclude
        };

        let artifacts = if self.artifact.is_empty() {
            file.artifacts.unwrap_or_default()
        } else {
            self.artifact
        };

        let mut config = CompilerConfig::new(source_dir, dest_dir, jython_home)
            .with_flags(flags)
            .with_flag_policy(flag_policy)
            .with_exclude(exclude)
            .with_artifacts(artifacts)
            .with_timeout(self.timeout.or(file.timeout_secs).map(Duration::from_secs));

        if let Some(suffix) = self.suffix.or(file.suffix) {
            config = config.with_source_suffix(suffix);
        }
        if let Some(runtime) = self.runtime.or(file.runtime) {
            config = config.with_runtime(runtime);
        }
        if let Some(jobs) = self.jobs.or(file.jobs) {
            config = config.with_jobs(jobs);
        }

        Ok(config)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jythonc-driver").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = parse(&[
            "--source-dir",
            "src/jython",
            "--dest-dir",
            "target/classes",
            "--jython-home",
            "/opt/jython",
            "--core",
            "-j",
            "3",
        ]);
        let file = FileConfig {
            source_dir: Some(PathBuf::from("ignored")),
            jobs: Some(8),
            suffix: Some(".jy".into()),
            ..Default::default()
        };

        let config = cli.into_config(file).unwrap();
        assert_eq!(config.source_root, PathBuf::from("src/jython"));
        assert_eq!(config.jobs, 3);
        assert_eq!(config.source_suffix, ".jy");
        assert!(config.flags.core && !config.flags.deep);
    }

    #[test]
    fn test_missing_home_reported() {
        let cli = parse(&["--source-dir", "a", "--dest-dir", "b"]);
        let err = cli.into_config(FileConfig::default()).unwrap_err();
        assert_eq!(err.0, "jython-home");
    }

    #[test]
    fn test_artifact_and_policy_flags() {
        let cli = parse(&[
            "--source-dir",
            "a",
            "--dest-dir",
            "b",
            "--jython-home",
            "c",
            "--artifact",
            "jython=/repo/jython.jar",
            "--implied-flags",
            "--timeout",
            "30",
        ]);
        let config = cli.into_config(FileConfig::default()).unwrap();
        assert_eq!(config.flag_policy, FlagPolicy::Implied);
        assert_eq!(config.tool_artifact().unwrap().path, PathBuf::from("/repo/jython.jar"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_bad_artifact_rejected() {
        let result = Cli::try_parse_from([
            "jythonc-driver",
            "--artifact",
            "no-equals-sign",
        ]);
        assert!(result.is_err());
    }
}
