//! Solver configuration for the CLI
//!
//! Precedence, lowest first: built-in defaults or the `--config` YAML file,
//! then environment variables, then command-line flags.

use omnicalc::SolverConfig;
use std::path::Path;
use tracing::debug;

use crate::commands::SolverArgs;
use crate::error::{CliError, CliResult};

/// Parses a YAML solver configuration
pub fn parse_config(yaml: &str) -> CliResult<SolverConfig> {
    let config: SolverConfig = serde_yaml_ng::from_str(yaml)?;
    let base_url = config.base_url.clone();
    Ok(config.with_base_url(base_url))
}

/// Reads a YAML solver configuration file
pub fn load_config_file(path: &Path) -> CliResult<SolverConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::config(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_config(&text)
}

/// Builds the effective configuration
pub fn resolve_config(file: Option<&Path>, args: &SolverArgs) -> CliResult<SolverConfig> {
    resolve_with_env(file, args, SolverConfig::from_env())
}

fn resolve_with_env(
    file: Option<&Path>,
    args: &SolverArgs,
    env: SolverConfig,
) -> CliResult<SolverConfig> {
    let mut config = match file {
        Some(path) => {
            let mut config = load_config_file(path)?;
            if env.api_key.is_some() {
                config.api_key = env.api_key;
            }
            config
        }
        None => env,
    };

    if let Some(api_key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config = config.with_api_key(api_key);
    }
    if let Some(model) = &args.model {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout_secs(secs);
    }

    debug!(
        model = %config.model,
        base_url = %config.base_url,
        has_key = config.has_api_key(),
        "resolved solver config"
    );
    Ok(config)
}
