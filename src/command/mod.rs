pub mod builder;
pub mod environment;

pub use builder::{build_arguments, ArgumentBuilder, CommandSpec};
pub use environment::{ToolEnvironment, CLASSPATH_VAR, JYTHON_HOME_VAR};
