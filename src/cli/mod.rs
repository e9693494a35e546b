//! CLI module for jythonc-driver
//!
//! - Argument parsing and config merging (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, MissingParameter};
pub use setup::{init_logging, log_level};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
