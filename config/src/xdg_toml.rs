//! Reads the `[env]` table of `<config home>/<app>/config.toml`.
//!
//! The config home is `$XDG_CONFIG_HOME` when set, else the platform config
//! directory from `dirs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set to a non-empty value, else `dirs::config_dir()`.
pub fn config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Loads `[env]` from `<home>/<app_name>/config.toml`. A missing file or section is an empty map.
pub fn load_env_map(home: &Path, app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = home.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}
