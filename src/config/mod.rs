mod core;
pub mod loader;
pub mod validation;

pub use self::core::{
    Artifact, CompileFlags, CompilerConfig, FileConfig, FlagPolicy, DEFAULT_RUNTIME,
    DEFAULT_SOURCE_SUFFIX, TOOL_ARTIFACT_ID,
};
pub use loader::{discover_config, load_config_from, parse_config, CONFIG_FILE_NAME};
pub use validation::{check_valid_directory, validate_config};
