// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// Diagnostics go to stderr through tracing-subscriber so they never mix with
// the tree or file content printed on stdout. The level comes from the
// number of -v flags; RUST_LOG, when set, takes precedence.
// =============================================================================

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // try_init: a second initialization (e.g. in tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}
