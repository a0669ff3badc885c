//! Bot configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `BOREDBOT_*` environment variables (`__` separates nested keys).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::dice::{DEFAULT_FALLBACK, DEFAULT_LINK_BASE};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "boredbot.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOREDBOT_";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the webhook server listens on
    pub bind_addr: SocketAddr,
    /// Directory holding the JSON resource tables
    pub resources_dir: PathBuf,
    pub wiki: WikiConfig,
    pub chat: ChatConfig,
    pub notify: NotifyConfig,
    pub songs: SongsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            resources_dir: PathBuf::from("resources"),
            wiki: WikiConfig::default(),
            chat: ChatConfig::default(),
            notify: NotifyConfig::default(),
            songs: SongsConfig::default(),
        }
    }
}

/// BookStack wiki API access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub base_url: String,
    pub api_id: String,
    pub api_key: String,
    /// Results requested per search
    pub page_size: u32,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/api".to_string(),
            api_id: String::new(),
            api_key: String::new(),
            page_size: 10,
        }
    }
}

/// Chat-completions endpoint used for rules questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Where webhook notifications go
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Chat webhook receiving `{"content": ...}` posts; unset means log only
    pub webhook_url: Option<String>,
    pub channel_id: u64,
}

/// Natural-20 song links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongsConfig {
    /// Prefix joined to every track id
    pub link_base: String,
    /// Track id for users without their own entry
    pub fallback: String,
}

impl Default for SongsConfig {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl Config {
    /// Build the figment for `path`, or the default file when `None`
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration; a missing file is not an error
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
