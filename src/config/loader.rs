use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::FileConfig;
use crate::errors::{CompileError, Result};

/// File name searched for in the current directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".jythonc.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a `.jythonc.toml` document.
pub fn parse_config(contents: &str) -> std::result::Result<FileConfig, String> {
    toml::from_str::<FileConfig>(contents).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Directory that relative paths in the file at `path` are resolved against.
fn config_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// Load a config file the user named explicitly. Any failure is an error.
///
/// Relative paths in the file are resolved against the file's directory.
pub fn load_config_from(path: &Path) -> Result<FileConfig> {
    let contents = read_config_file(path).map_err(|e| CompileError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config = parse_config(&contents).map_err(|message| CompileError::ConfigFile {
        path: path.to_path_buf(),
        message,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config.relative_to(config_dir(path)))
}

fn try_load_config_from_path(config_path: &Path) -> Option<FileConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config.relative_to(config_dir(config_path)))
        }
        Err(e) => {
            log::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
pub fn discover_config_from(start: PathBuf) -> Option<(PathBuf, FileConfig)> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path).map(|config| (path, config)))
}

/// Search the current directory and its ancestors for a config file.
pub fn discover_config() -> Option<(PathBuf, FileConfig)> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using defaults.", e);
            return None;
        }
    };

    discover_config_from(current).or_else(|| {
        log::debug!(
            "No {} found after checking {} directories",
            CONFIG_FILE_NAME,
            MAX_TRAVERSAL_DEPTH
        );
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::FlagPolicy;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(indoc! {r#"
            source_dir = "src/main/jython"
            dest_dir = "target/classes"
            jython_home = "/opt/jython"
            flag_policy = "implied"
            suffix = ".jy"
            exclude = ["**/test_*.py"]
            jobs = 4
            timeout_secs = 30

            [flags]
            core = true

            [[artifacts]]
            id = "jython"
            path = "/repo/jython.jar"
        "#})
        .unwrap();

        assert_eq!(config.source_dir, Some(PathBuf::from("src/main/jython")));
        assert_eq!(config.flag_policy, Some(FlagPolicy::Implied));
        assert_eq!(config.suffix.as_deref(), Some(".jy"));
        assert_eq!(config.jobs, Some(4));
        let flags = config.flags.unwrap();
        assert!(flags.core && !flags.deep && !flags.all);
        assert_eq!(config.artifacts.unwrap()[0].id, "jython");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        assert!(parse_config("sourcedir = \"x\"").is_err());
    }

    #[test]
    fn test_load_config_from_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from(&temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CompileError::ConfigFile { .. }));
    }

    #[test]
    fn test_discover_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "jobs = 2\n").unwrap();

        let (path, config) = discover_config_from(nested).unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_discovered_paths_anchor_at_config_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("pkg");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "source_dir = \"src\"\njython_home = \"/opt/jython\"\n",
        )
        .unwrap();

        let (_, config) = discover_config_from(nested).unwrap();
        assert_eq!(config.source_dir, Some(temp.path().join("src")));
        assert_eq!(config.jython_home, Some(PathBuf::from("/opt/jython")));
    }

    #[test]
    fn test_directory_ancestors_is_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }
}
