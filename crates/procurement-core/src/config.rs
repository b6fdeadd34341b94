//! Application configuration management.
//!
//! Configuration holds the API base URL, the request timeout, and the last
//! username used to log in. It is stored at
//! `~/.config/procurement/config.json`. The `API_BASE_URL` environment
//! variable takes precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "procurement";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Environment variable overriding the configured base URL
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Base URL used when neither the environment nor the config file sets one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// HTTP request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORAGE_FILE))
    }

    /// Base URL every endpoint is appended to
    pub fn api_base_url(&self) -> String {
        pick_base_url(
            std::env::var(API_BASE_URL_ENV).ok(),
            self.api_base_url.as_deref(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

fn pick_base_url(from_env: Option<String>, configured: Option<&str>) -> String {
    from_env
        .filter(|url| !url.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_base_url_precedence() {
        assert_eq!(
            pick_base_url(Some("http://env/api".into()), Some("http://file/api")),
            "http://env/api"
        );
        assert_eq!(pick_base_url(None, Some("http://file/api")), "http://file/api");
        assert_eq!(pick_base_url(Some("  ".into()), Some("http://file/api")), "http://file/api");
        assert_eq!(pick_base_url(None, Some("")), DEFAULT_API_BASE_URL);
        assert_eq!(pick_base_url(None, None), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_request_timeout_default() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        let config = Config {
            request_timeout_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        let config = Config {
            request_timeout_secs: Some(5),
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_parses_partial_file() {
        let config: Config = serde_json::from_str(r#"{"api_base_url": "https://erp.example.id/api"}"#)
            .expect("partial config should parse");
        assert_eq!(config.api_base_url.as_deref(), Some("https://erp.example.id/api"));
        assert_eq!(config.last_username, None);
    }
}
