pub mod config;
pub mod estimate;
pub mod plan;
pub mod transition;
pub mod validate;

use focusplan_core::Config;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load the config from `--config` or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Persist the config to `--config` or the default location.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("{} is not valid JSON for this command: {e}", path.display()))?;
    Ok(value)
}
