//! Settings file loading.
//!
//! The settings file is optional: a missing file at the default path means
//! built-in defaults. A file that exists but does not parse is an error.

use std::path::Path;

use rootfind_core::settings::SolverDefaults;
use tracing::debug;

use crate::{CliError, Result};

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rootfind.toml";

/// Load solver defaults from `path`.
pub fn load(path: &str) -> Result<SolverDefaults> {
    if !Path::new(path).exists() {
        debug!(path, "no config file, using built-in defaults");
        return Ok(SolverDefaults::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    let defaults = parse(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_string(),
        source,
    })?;
    defaults.validate()?;

    debug!(path, ?defaults, "loaded config file");
    Ok(defaults)
}

fn parse(text: &str) -> std::result::Result<SolverDefaults, toml::de::Error> {
    toml::from_str(text)
}
