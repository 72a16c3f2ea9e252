//! Log subscriber setup for the binary.
//!
//! The global subscriber depends on the config file (`log_filter`), so config
//! loading itself runs under a scoped provisional subscriber with the same
//! writer. Warnings raised while loading still reach stderr.

use crate::config::{Config, ConfigError};
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Build the filter: `RUST_LOG`, then `-v` flags, then the config's filter,
/// then `warn`.
pub fn env_filter(verbose: u8, config_filter: Option<&str>) -> EnvFilter {
    let fallback = match verbose {
        0 => config_filter.unwrap_or("warn"),
        1 => "calcpad=debug",
        _ => "calcpad=trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Load configuration with logging already active.
pub fn load_config(path: Option<&Path>, verbose: u8) -> Result<Config, ConfigError> {
    load_config_with_writer(path, verbose, io::stderr)
}

fn load_config_with_writer<W>(
    path: Option<&Path>,
    verbose: u8,
    writer: W,
) -> Result<Config, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let provisional = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, None))
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(provisional, || Config::load(path))
}

/// Install the global subscriber on stderr.
pub fn init(verbose: u8, config_filter: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, config_filter))
        .with_writer(io::stderr)
        .init();
}
