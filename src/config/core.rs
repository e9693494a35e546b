use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default suffix for Jython source files
pub const DEFAULT_SOURCE_SUFFIX: &str = ".py";

/// Runtime binary expected on the execution search path
pub const DEFAULT_RUNTIME: &str = "java";

/// Artifact id whose file is appended to the tool's class path
pub const TOOL_ARTIFACT_ID: &str = "jython";

/// Optional jythonc switches.
///
/// jythonc documents `core` as implying `deep`, and `all` as implying both.
/// Whether that hierarchy is applied is decided by [`FlagPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileFlags {
    /// Compile all Python dependencies of the module
    #[serde(default)]
    pub deep: bool,
    /// Include the core Jython libraries
    #[serde(default)]
    pub core: bool,
    /// Include all of the Jython libraries (core + compiler and parser)
    #[serde(default)]
    pub all: bool,
}

impl CompileFlags {
    /// Flags after applying `policy`.
    #[must_use]
    pub fn effective(self, policy: FlagPolicy) -> Self {
        match policy {
            FlagPolicy::Independent => self,
            FlagPolicy::Implied => {
                let core = self.core || self.all;
                Self {
                    deep: self.deep || core,
                    core,
                    all: self.all,
                }
            }
        }
    }
}

/// How the documented flag hierarchy is handled when assembling commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagPolicy {
    /// Emit exactly the flags that were set
    #[default]
    Independent,
    /// Expand `all => core => deep` before emitting
    Implied,
}

/// A build dependency supplied by the surrounding build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Parse the `ID=PATH` form used on the command line.
    pub fn parse(spec: &str) -> Result<Self, String> {
        match spec.split_once('=') {
            Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(id.trim(), path.trim()))
            }
            _ => Err(format!("expected ID=PATH, got '{spec}'")),
        }
    }
}

/// Configuration for one compilation run.
///
/// Built once from the caller's parameters and not modified afterwards.
/// `source_root` and `tool_home` must be existing directories (checked by
/// [`validate_config`](super::validate_config)); `dest_root` is created by
/// jythonc itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub tool_home: PathBuf,
    pub flags: CompileFlags,
    pub flag_policy: FlagPolicy,
    pub source_suffix: String,
    pub exclude: Vec<String>,
    pub runtime: String,
    /// Worker count: 1 is sequential, 0 uses available parallelism
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub artifacts: Vec<Artifact>,
}

impl CompilerConfig {
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        tool_home: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            tool_home: tool_home.into(),
            flags: CompileFlags::default(),
            flag_policy: FlagPolicy::default(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            exclude: Vec::new(),
            runtime: DEFAULT_RUNTIME.to_string(),
            jobs: 1,
            timeout: None,
            artifacts: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: CompileFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_flag_policy(mut self, policy: FlagPolicy) -> Self {
        self.flag_policy = policy;
        self
    }

    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Flags with the configured policy applied.
    #[must_use]
    pub fn effective_flags(&self) -> CompileFlags {
        self.flags.effective(self.flag_policy)
    }

    /// The build dependency that carries the Jython runtime, if supplied.
    #[must_use]
    pub fn tool_artifact(&self) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == TOOL_ARTIFACT_ID)
    }

    pub fn tool_jar(&self) -> PathBuf {
        self.tool_home.join("jython.jar")
    }

    pub fn jythonc_script(&self) -> PathBuf {
        self.tool_home.join("Tools").join("jythonc").join("jythonc.py")
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }
}

/// Contents of a `.jythonc.toml` file. Every field is optional; values
/// given explicitly on the command line take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,
    #[serde(default)]
    pub jython_home: Option<PathBuf>,
    #[serde(default)]
    pub flags: Option<CompileFlags>,
    #[serde(default)]
    pub flag_policy: Option<FlagPolicy>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub artifacts: Option<Vec<Artifact>>,
}

impl FileConfig {
    /// Resolve relative paths against `base`, the directory holding the file.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        self.source_dir = self.source_dir.map(anchor);
        self.dest_dir = self.dest_dir.map(anchor);
        self.jython_home = self.jython_home.map(anchor);
        if let Some(artifacts) = self.artifacts.as_mut() {
            for artifact in artifacts {
                artifact.path = anchor(std::mem::take(&mut artifact.path));
            }
        }
        self
    }
}
