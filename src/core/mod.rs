//! Data model shared by the scanner, the resolver and the command builder.

pub mod job;
pub mod package;
pub mod source;

pub use job::CompileJob;
pub use package::{resolve_package, Package};
pub use source::SourceFile;
