use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "autodirs.toml";

/// Directory scaffolding declared in `autodirs.toml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DirsConfig {
    pub base_dir: Option<String>,
    #[serde(default)]
    pub dirs: Vec<String>,
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<DirsConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    parse(&raw).with_context(|| format!("parsing config {}", path))
}

fn parse(raw: &str) -> Result<DirsConfig> {
    Ok(toml::from_str(raw)?)
}
