//! Tracing setup for CENO binaries.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` for verbose runs
/// and `info` otherwise. Later calls are no-ops.
pub fn init_logging(verbose: bool, format: LogFormat) {
    INIT.call_once(|| {
        let default_level = if verbose { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match format {
            LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        if let Err(err) = result {
            eprintln!("logging already initialized: {err}");
        }
    });
}
