use crate::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_ACTIVITY_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Board data file used by the CLI and the server.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub bind_address: Option<String>,
    /// Serialize card moves per board. When disabled, concurrent moves on one
    /// board are last-writer-wins.
    #[serde(default)]
    pub serialize_moves: Option<bool>,
    #[serde(default)]
    pub activity_limit: Option<usize>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/kanban/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("kanban/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("kanban\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::load_from(&config_path) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> KanbanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> KanbanResult<Self> {
        toml::from_str(content).map_err(|e| KanbanError::Serialization(e.to_string()))
    }

    pub fn effective_data_file(&self) -> Option<PathBuf> {
        self.data_file
            .clone()
            .or_else(|| dirs::data_dir().map(|data| data.join("kanban").join("boards.json")))
    }

    pub fn effective_bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn effective_serialize_moves(&self) -> bool {
        self.serialize_moves.unwrap_or(true)
    }

    pub fn effective_activity_limit(&self) -> usize {
        self.activity_limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT)
    }
}
