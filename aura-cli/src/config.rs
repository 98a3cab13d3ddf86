use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the settings record and background database live
    pub data_dir: Option<PathBuf>,
    /// tracing filter directive, e.g. "aura_core=debug"; AURA_LOG wins
    pub log_filter: Option<String>,
}

pub fn config_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.config_dir().join("aura")
    } else {
        PathBuf::from("./.config/aura")
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.data_dir().join("aura")
    } else {
        config_dir().join("data")
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Missing or malformed files fall back to defaults.
pub fn load_config() -> Config {
    let path = config_path();
    if let Ok(s) = std::fs::read_to_string(&path) {
        toml::from_str(&s).unwrap_or_default()
    } else {
        Config::default()
    }
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => default_data_dir(),
        }
    }

    pub fn background_db(&self) -> PathBuf {
        self.data_dir().join("backgrounds.db")
    }
}
