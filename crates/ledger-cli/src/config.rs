use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Chain parameters read from an optional TOML file. Command-line flags take
/// precedence over anything set here.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    pub difficulty: Option<u32>,
    pub data_dir: Option<PathBuf>,
}

pub fn load_toml(path: &Path) -> Result<ChainConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    info!("Loaded configuration file: {}.", path.display());
    Ok(config)
}
