//! AutoSpec CLI Library
//!
//! Command implementations for the AutoSpec binary, exposed as a library so
//! they can be driven from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, ping, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use autospec::cmd;
//!
//! // Build the site into the configured output directory
//! cmd::build::run(Path::new("autospec.toml"), None, None).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use autospec_core::Config;
pub use autospec_generator::{BuildStats, Builder};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// autospec::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
