//! Command dispatch: bridges CLI args to the config and core crates.

pub mod check;
pub mod config_cmd;
pub mod run;

use stockwatch_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the effective configuration for the global `--config` flag.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let config = stockwatch_config::load_config(global.config.as_deref())?;
    tracing::debug!(
        locations = config.locations.len(),
        scope = %config.notify_scope,
        "configuration loaded"
    );
    Ok(config)
}
