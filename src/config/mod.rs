// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Runtime configuration
//!
//! Defaults live under the platform data directory. A `config.json` there
//! overrides them, and `SWITCHBOARD_PIPE` / `SWITCHBOARD_DATA_DIR` override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Named pipe name for Windows
#[cfg(windows)]
const DEFAULT_PIPE_NAME: &str = r"\\.\pipe\switchboard_ipc";

/// Unix socket path
#[cfg(not(windows))]
const DEFAULT_PIPE_NAME: &str = "/tmp/switchboard_ipc.sock";

const CONFIG_FILE: &str = "config.json";

pub const ENV_PIPE: &str = "SWITCHBOARD_PIPE";
pub const ENV_DATA_DIR: &str = "SWITCHBOARD_DATA_DIR";

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    /// Maximum level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file prefix
    pub file_prefix: String,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_prefix: "switchboard".to_string(),
            console_output: true,
            file_output: true,
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Socket path (unix) or pipe name (windows) the UI connects to
    pub pipe_name: String,
    /// Directory holding the database and logs
    pub data_dir: PathBuf,
    /// Page size for `notifications.get`
    pub notifications_limit: u32,
    pub log: LogSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            pipe_name: DEFAULT_PIPE_NAME.to_string(),
            data_dir: default_data_dir(),
            notifications_limit: 40,
            log: LogSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Load from the environment and the data directory
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with a custom variable lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let mut config = Self::from_file(&data_dir.join(CONFIG_FILE))?.unwrap_or_default();
        config.data_dir = data_dir;

        if let Some(pipe) = lookup(ENV_PIPE) {
            config.pipe_name = pipe;
        }

        Ok(config)
    }

    /// Read a config file, `None` if it does not exist
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("cache.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Switchboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("switchboard-{}-{}", name, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = temp_dir("defaults");
        let dir_str = dir.display().to_string();
        let config = CoreConfig::load_with(|key| match key {
            ENV_DATA_DIR => Some(dir_str.clone()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.data_dir, dir);
        assert_eq!(config.pipe_name, DEFAULT_PIPE_NAME);
        assert_eq!(config.notifications_limit, 40);
        assert_eq!(config.db_path(), dir.join("cache.db"));
    }

    #[test]
    fn file_values_and_env_overrides_layer() {
        let dir = temp_dir("layered");
        std::fs::write(
            dir.join(CONFIG_FILE),
            r#"{ "notifications_limit": 15, "log": { "level": "debug" } }"#,
        )
        .unwrap();

        let dir_str = dir.display().to_string();
        let config = CoreConfig::load_with(|key| match key {
            ENV_DATA_DIR => Some(dir_str.clone()),
            ENV_PIPE => Some("/tmp/custom.sock".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.notifications_limit, 15);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.file_output);
        assert_eq!(config.pipe_name, "/tmp/custom.sock");
        assert_eq!(config.data_dir, dir);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = temp_dir("broken");
        std::fs::write(dir.join(CONFIG_FILE), "{ not json").unwrap();
        assert!(CoreConfig::from_file(&dir.join(CONFIG_FILE)).is_err());
    }
}
