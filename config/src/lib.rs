//! Layered environment configuration for docs-chat.
//!
//! Values come from three places, highest priority first:
//!
//! 1. the process environment (never overwritten),
//! 2. the project `.env` (current directory or an override directory),
//! 3. `$XDG_CONFIG_HOME/<app>/config.toml`, `[env]` table.
//!
//! [`load_and_apply`] copies the winning `.env` / XDG values into the process
//! environment so the rest of the program only reads `std::env`.

mod dotenv_file;
mod xdg_toml;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use xdg_toml::config_home;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read {path}: {message}")]
    Dotenv { path: String, message: String },
}

/// Where an applied value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    DotEnv,
    Xdg,
}

/// One variable written into the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub key: String,
    pub source: Source,
}

/// The `.env` and XDG layers, loaded but not yet applied.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    dotenv: HashMap<String, String>,
    xdg: HashMap<String, String>,
}

impl ConfigLayers {
    /// Loads `.env` from `override_dir` (or the current directory) and the XDG
    /// file for `app_name` from [`config_home`].
    pub fn load(app_name: &str, override_dir: Option<&Path>) -> Result<Self, LoadError> {
        Self::from_dirs(app_name, override_dir, config_home().as_deref())
    }

    /// Like [`load`](Self::load) with an explicit config home; `None` skips the XDG layer.
    pub fn from_dirs(
        app_name: &str,
        dotenv_dir: Option<&Path>,
        config_home: Option<&Path>,
    ) -> Result<Self, LoadError> {
        let xdg = match config_home {
            Some(home) => xdg_toml::load_env_map(home, app_name)?,
            None => HashMap::new(),
        };
        Ok(Self {
            dotenv: dotenv_file::load_env_map(dotenv_dir)?,
            xdg,
        })
    }

    /// Value for `key` from the layers alone (`.env` before XDG).
    pub fn get(&self, key: &str) -> Option<(&str, Source)> {
        self.dotenv
            .get(key)
            .map(|v| (v.as_str(), Source::DotEnv))
            .or_else(|| self.xdg.get(key).map(|v| (v.as_str(), Source::Xdg)))
    }

    /// Key/value pairs that would be written, sorted by key, skipping keys for
    /// which `is_set` reports an existing value.
    pub fn pending<F>(&self, is_set: F) -> Vec<(String, String, Source)>
    where
        F: Fn(&str) -> bool,
    {
        let keys: BTreeSet<&str> = self
            .dotenv
            .keys()
            .chain(self.xdg.keys())
            .map(String::as_str)
            .collect();
        keys.into_iter()
            .filter(|k| !is_set(*k))
            .filter_map(|k| {
                self.get(k)
                    .map(|(v, source)| (k.to_string(), v.to_string(), source))
            })
            .collect()
    }

    /// Writes every pending value into the process environment.
    pub fn apply(&self) -> Vec<Applied> {
        let pending = self.pending(|k| std::env::var_os(k).is_some());
        pending
            .into_iter()
            .map(|(key, value, source)| {
                std::env::set_var(&key, value);
                Applied { key, source }
            })
            .collect()
    }
}

/// Path of the XDG config file for `app_name`, whether or not it exists.
pub fn config_file_path(app_name: &str) -> Option<PathBuf> {
    config_home().map(|home| home.join(app_name).join("config.toml"))
}

/// Loads both layers and applies them to the process environment.
///
/// * `app_name`: e.g. `"docs-chat"`; selects `<config home>/<app_name>/config.toml`.
/// * `override_dir`: directory holding `.env` instead of the current directory.
///
/// Returns the variables that were set, so callers can log where each came from.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<Applied>, LoadError> {
    Ok(ConfigLayers::load(app_name, override_dir)?.apply())
}
