use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::ToolConfig;

pub const CONFIG_FILE_NAME: &str = "canvas_tools.json";

/// Default location for the tool configuration, under the user's
/// configuration directory.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs_next::config_dir().ok_or_else(|| anyhow!("no user configuration directory"))?;
    Ok(base.join("note_canvas").join(CONFIG_FILE_NAME))
}

pub fn load() -> Result<ToolConfig> {
    let path = default_config_path()?;
    Ok(load_from_path(&path)?.unwrap_or_default())
}

pub fn save(config: &ToolConfig) -> Result<PathBuf> {
    let path = default_config_path()?;
    save_to_path(&path, config)?;
    Ok(path)
}

/// Load the configuration from an explicit path. A missing file is `None`,
/// an empty file is the defaults.
pub fn load_from_path(path: &Path) -> Result<Option<ToolConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read tool config file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Some(ToolConfig::default()));
    }

    let loaded: ToolConfig = serde_json::from_str(&content)
        .with_context(|| format!("deserialize tool config file {}", path.display()))?;
    Ok(Some(loaded))
}

pub fn save_to_path(path: &Path, config: &ToolConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create tool config folder {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("serialize tool config")?;
    std::fs::write(path, json)
        .with_context(|| format!("write tool config file {}", path.display()))
}
