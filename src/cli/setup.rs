//! Runtime initialization for the command-line binary.

use log::LevelFilter;

/// Log level for a `-v` count.
pub fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger`. `RUST_LOG` takes precedence over `-v`.
pub fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level(verbosity))
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();

    if let Err(e) = builder.try_init() {
        // Already configured - this is fine, just ignore
        eprintln!("Note: Logger already configured: {}", e);
    }
}
