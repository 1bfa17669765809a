//! Application configuration.
//!
//! Values come from an optional TOML file, then `SUBFEED_*` environment
//! variables. Command-line flags are layered on top by the binary.

use crate::{ConfigError, CoreError, LayoutConfig, LayoutMode, SortMode, TimeWindow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
pub const DEFAULT_WEB_BASE: &str = "https://reddit.com";

pub const ENV_CONFIG_PATH: &str = "SUBFEED_CONFIG";
pub const ENV_CLIENT_ID: &str = "SUBFEED_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SUBFEED_CLIENT_SECRET";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reddit: RedditSettings,
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    pub token_url: String,
    pub api_base: String,
    pub web_base: String,
    /// Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: format!("subfeed/{}", env!("CARGO_PKG_VERSION")),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl RedditSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub channel: Option<String>,
    /// Raw limit as typed; parsed with [`crate::parse_limit`].
    pub limit: String,
    pub sort: SortMode,
    pub time_window: Option<TimeWindow>,
    pub layout: LayoutMode,
    pub columns: u32,
    pub thumbnail_size: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            channel: None,
            limit: crate::DEFAULT_LIMIT.to_string(),
            sort: SortMode::default(),
            time_window: None,
            layout: layout.mode,
            columns: layout.columns,
            thumbnail_size: layout.thumbnail_size_px,
        }
    }
}

impl FeedSettings {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            mode: self.layout,
            columns: self.columns,
            thumbnail_size_px: self.thumbnail_size,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path` when given, otherwise falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                let raw = std::fs::read_to_string(path)?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&raw)?
            }
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides credentials from the environment. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(client_id) = non_blank(ENV_CLIENT_ID) {
            debug!("Using client id from {}", ENV_CLIENT_ID);
            self.reddit.client_id = Some(client_id);
        }
        if let Some(client_secret) = non_blank(ENV_CLIENT_SECRET) {
            debug!("Using client secret from {}", ENV_CLIENT_SECRET);
            self.reddit.client_secret = Some(client_secret);
        }
    }
}
