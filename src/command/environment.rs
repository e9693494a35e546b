//! Environment handed to every jythonc child process.
//!
//! Built once per run and passed explicitly to each spawn; the driver never
//! mutates its own process environment, so workers can share it freely.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::CompilerConfig;

/// Class path variable read by the JVM
pub const CLASSPATH_VAR: &str = "CLASSPATH";
/// Home pointer read by the Jython runtime
pub const JYTHON_HOME_VAR: &str = "JYTHON_HOME";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolEnvironment {
    vars: BTreeMap<String, OsString>,
}

impl ToolEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the run configuration and the inherited `CLASSPATH`.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::from_config_with(config, std::env::var_os(CLASSPATH_VAR))
    }

    /// Same as [`from_config`](Self::from_config) with an explicit base class path.
    pub fn from_config_with(config: &CompilerConfig, inherited: Option<OsString>) -> Self {
        let mut entries: Vec<PathBuf> = inherited
            .as_deref()
            .map(|cp| std::env::split_paths(cp).collect())
            .unwrap_or_default();

        if let Some(artifact) = config.tool_artifact() {
            log::debug!("Adding {} to the class path", artifact.path.display());
            entries.push(artifact.path.clone());
        }

        let mut env = Self::new().with_var(JYTHON_HOME_VAR, config.tool_home.as_os_str());

        if !entries.is_empty() {
            match std::env::join_paths(&entries) {
                Ok(classpath) => env = env.with_var(CLASSPATH_VAR, classpath),
                Err(e) => log::warn!("Cannot build {}: {}", CLASSPATH_VAR, e),
            }
        }

        env
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&OsString> {
        self.vars.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OsString)> {
        self.vars.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Artifact;

    #[test]
    fn test_home_pointer_always_set() {
        let config = CompilerConfig::new("src", "out", "/opt/jython");
        let env = ToolEnvironment::from_config_with(&config, None);
        assert_eq!(env.get(JYTHON_HOME_VAR), Some(&OsString::from("/opt/jython")));
        assert!(env.get(CLASSPATH_VAR).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_artifact_appended_to_inherited_classpath() {
        let config = CompilerConfig::new("src", "out", "/opt/jython").with_artifacts(vec![
            Artifact::new("commons-io", "/repo/commons-io.jar"),
            Artifact::new("jython", "/repo/jython-2.2.jar"),
        ]);
        let env = ToolEnvironment::from_config_with(&config, Some("/lib/a.jar".into()));
        assert_eq!(
            env.get(CLASSPATH_VAR),
            Some(&OsString::from("/lib/a.jar:/repo/jython-2.2.jar"))
        );
    }

    #[test]
    fn test_other_artifacts_ignored() {
        let config = CompilerConfig::new("src", "out", "/opt/jython")
            .with_artifacts(vec![Artifact::new("junit", "/repo/junit.jar")]);
        let env = ToolEnvironment::from_config_with(&config, None);
        assert!(env.get(CLASSPATH_VAR).is_none());
    }
}
