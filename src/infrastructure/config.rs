use crate::domain::{
    config::PartialBridgeConfig,
    error::{BreakBridgeError, BreakBridgeResult},
};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load bridge settings from a TOML file. Every key is optional.
pub fn load_config_from_path(path: &Path) -> BreakBridgeResult<PartialBridgeConfig> {
    let content = fs::read_to_string(path).map_err(|e| BreakBridgeError::Config {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;

    let config = parse_config(&content).map_err(|e| BreakBridgeError::Config {
        message: format!("Failed to parse config file {}: {}", path.display(), e),
    })?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<PartialBridgeConfig, toml::de::Error> {
    toml::from_str(content)
}
