use crate::parser::{parse_engine_config, EngineConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "engine_config.cfg";

pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read engine config {}", path.display()))?;
    let config = parse_engine_config(&contents)
        .with_context(|| format!("invalid engine config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded engine config");
    Ok(config)
}
