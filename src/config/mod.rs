use crate::cache::CachePolicy;
use crate::core::path::{config_file, ensure_dir};
use crate::core::{TagwatchError, TagwatchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub endpoints and credentials
    #[serde(default)]
    pub github: GitHubConfig,

    /// Cache directory (defaults to platform-specific cache directory)
    ///
    /// Default locations:
    /// - Windows: %LOCALAPPDATA%\tagwatch
    /// - Linux: ~/.cache/tagwatch
    /// - macOS: ~/Library/Caches/tagwatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    /// Freshness policies for the two cached lookups
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST/GraphQL API root (GraphQL lives at `{api_url}/graphql`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Web root used for release pages
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Personal access token. `GITHUB_TOKEN` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Latest tag and up-to-date flag
    #[serde(default = "default_publish_state_policy")]
    pub publish_state: PolicyConfig,

    /// Commit count since the latest tag
    #[serde(default = "default_ahead_by_policy")]
    pub ahead_by: PolicyConfig,
}

/// Cache policy expressed in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub max_age_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_while_revalidate_secs: Option<u64>,
}

impl PolicyConfig {
    pub fn to_policy(&self) -> CachePolicy {
        CachePolicy {
            max_age: Duration::from_secs(self.max_age_secs),
            stale_while_revalidate: self.stale_while_revalidate_secs.map(Duration::from_secs),
        }
    }
}

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}

fn default_publish_state_policy() -> PolicyConfig {
    PolicyConfig {
        max_age_secs: HOUR,
        stale_while_revalidate_secs: Some(2 * DAY),
    }
}

fn default_ahead_by_policy() -> PolicyConfig {
    PolicyConfig {
        max_age_secs: DAY,
        stale_while_revalidate_secs: Some(2 * DAY),
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_url: default_web_url(),
            token: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            publish_state: default_publish_state_policy(),
            ahead_by: default_ahead_by_policy(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            cache_dir: None,
            cache: CacheSettings::default(),
        }
    }
}

impl Config {
    /// Load config from platform-specific config directory, creating default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\tagwatch\config.yaml
    /// - Linux: ~/.config/tagwatch/config.yaml
    /// - macOS: ~/Library/Application Support/tagwatch/config.yaml
    pub fn load() -> TagwatchResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, writing defaults there if it is missing
    pub fn load_from(config_path: &Path) -> TagwatchResult<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(config_path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| TagwatchError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> TagwatchResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| TagwatchError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| TagwatchError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, content)?;
        Ok(())
    }

    /// Get the cache directory path
    pub fn get_cache_dir(&self) -> TagwatchResult<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            Ok(PathBuf::from(dir))
        } else {
            crate::core::path::cache_dir()
        }
    }

    /// Token from `GITHUB_TOKEN`, falling back to the config file
    pub fn github_token(&self) -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.github.token.clone())
    }
}
