pub mod catalog;
pub mod merge;

use anyhow::{Context, Result};
use sheet_merge::MergeConfig;
use std::fs;

/// Load a [`MergeConfig`] from a JSON file, or fall back to the defaults.
pub fn load_config(path: Option<&str>) -> Result<MergeConfig> {
    let Some(path) = path else {
        return Ok(MergeConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config: MergeConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path))?;
    Ok(config)
}
