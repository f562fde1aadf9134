//! Log output setup
//!
//! Logs go to stderr so stdout stays clean for results.

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

/// Filter directive for a `-v` count
#[must_use]
pub const fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter: `-v` wins, then `RUST_LOG`, then `warn`
#[must_use]
pub fn build_filter(verbose: u8) -> EnvFilter {
    if verbose > 0 {
        return EnvFilter::new(level_for(verbose));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(0)))
}

/// Installs the global subscriber
pub fn init(verbose: u8, json: bool) -> CliResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };
    result.map_err(|e| CliError::config(format!("cannot install logger: {e}")))
}
