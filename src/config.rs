//! Configuration file support for podcastr.
//!
//! This module provides functionality for loading and saving user preferences
//! from a TOML configuration file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the episodes REST backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// How many episodes the homepage requests
    #[serde(default = "default_episode_limit")]
    pub episode_limit: usize,

    /// How many of them are featured as "latest"
    #[serde(default = "default_latest_count")]
    pub latest_count: usize,

    /// Audio player command (overrides platform default)
    #[serde(default)]
    pub player: Option<String>,

    /// Additional arguments to pass to the audio player
    #[serde(default)]
    pub player_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_api_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_episode_limit() -> usize {
    12
}

fn default_latest_count() -> usize {
    2
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            api_url: default_api_url(),
            episode_limit: default_episode_limit(),
            latest_count: default_latest_count(),
            player: None,
            player_args: Vec::new(),
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/podcastr/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("podcastr");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Create a default config file if one doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn create_default_if_missing() -> Result<PathBuf> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            Self::new().save()?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_has_defaults() {
        let config = Config::new();
        assert_eq!(config.api_url, "http://localhost:3333");
        assert_eq!(config.episode_limit, 12);
        assert_eq!(config.latest_count, 2);
        assert!(config.player.is_none());
        assert!(config.player_args.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            api_url: "https://podcastr.example".to_string(),
            episode_limit: 20,
            latest_count: 4,
            player: Some("ffplay".to_string()),
            player_args: vec!["-nodisp".to_string()],
        };

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("api_url = \"https://podcastr.example\""));
        assert!(toml_str.contains("episode_limit = 20"));
        assert!(toml_str.contains("latest_count = 4"));
        assert!(toml_str.contains("player = \"ffplay\""));
        assert!(toml_str.contains("player_args"));
    }

    #[test]
    fn test_config_partial_deserialization() {
        let toml_str = r#"
            api_url = "http://127.0.0.1:4000"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:4000");
        assert_eq!(config.episode_limit, 12);
        assert_eq!(config.latest_count, 2);
        assert!(config.player.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.latest_count, 2);
    }
}
