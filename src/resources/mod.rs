//! Resource tables
//!
//! JSON files read once at start-up and shared read-only afterwards:
//! critical-roll flavor, per-user critical songs, weather forecasts and
//! new-page announcements.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::SongsConfig;
use crate::dice::{EasterEggs, FlavorTable, RandomSource};

pub const CRITICAL_RESPONSES_FILE: &str = "dice_critical_responses.json";
pub const CRITICAL_SONGS_FILE: &str = "critical_songs.json";
pub const FORECAST_FILE: &str = "forecast.json";
pub const NEW_POST_MESSAGES_FILE: &str = "new_post_messages.json";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{0} contains no entries")]
    Empty(PathBuf),
}

/// A non-empty list of interchangeable messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePool {
    messages: Vec<String>,
}

impl MessagePool {
    /// Returns `None` for an empty list
    pub fn new(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn choose(&self, rng: &mut impl RandomSource) -> &str {
        &self.messages[rng.pick(self.messages.len())]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Every table the bot needs, loaded together
#[derive(Debug, Clone)]
pub struct Resources {
    pub flavor: FlavorTable,
    pub easter_eggs: EasterEggs,
    pub forecasts: MessagePool,
    pub new_post_messages: MessagePool,
}

impl Resources {
    /// Load all resource files from `dir`, linking songs per `songs`
    pub fn load(dir: &Path, songs_config: &SongsConfig) -> Result<Self, ResourceError> {
        let flavor: FlavorTable = read_json(&dir.join(CRITICAL_RESPONSES_FILE))?;
        let songs: HashMap<String, String> = read_json(&dir.join(CRITICAL_SONGS_FILE))?;
        let forecasts = read_pool(&dir.join(FORECAST_FILE))?;
        let new_post_messages = read_pool(&dir.join(NEW_POST_MESSAGES_FILE))?;

        debug!(
            "Loaded resources from {}: {} songs, {} forecasts, {} announcements",
            dir.display(),
            songs.len(),
            forecasts.len(),
            new_post_messages.len()
        );

        Ok(Self {
            flavor,
            easter_eggs: EasterEggs::new(songs)
                .with_link_base(&songs_config.link_base)
                .with_fallback(&songs_config.fallback),
            forecasts,
            new_post_messages,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ResourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Message files are JSON objects; only the values matter, in key order
fn read_pool(path: &Path) -> Result<MessagePool, ResourceError> {
    let entries: BTreeMap<String, String> = read_json(path)?;
    MessagePool::new(entries.into_values().collect())
        .ok_or_else(|| ResourceError::Empty(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Critical;
    use tempfile::TempDir;

    fn write_all(dir: &Path, forecasts: &str) {
        std::fs::write(
            dir.join(CRITICAL_RESPONSES_FILE),
            r#"{"success": ["Nailed it!"], "failure": ["Yikes."]}"#,
        )
        .unwrap();
        std::fs::write(dir.join(CRITICAL_SONGS_FILE), r#"{"sasha": "track1"}"#).unwrap();
        std::fs::write(dir.join(FORECAST_FILE), forecasts).unwrap();
        std::fs::write(
            dir.join(NEW_POST_MESSAGES_FILE),
            r#"{"1": "Fresh ink!", "2": "Hot off the quill!"}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_all() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), r#"{"a": "Sunny", "b": "Rain of frogs"}"#);

        let resources = Resources::load(dir.path(), &SongsConfig::default()).unwrap();
        assert_eq!(
            resources.flavor.phrases(Critical::Success),
            &["Nailed it!".to_string()]
        );
        assert_eq!(
            resources.easter_eggs.link_for("sasha"),
            "https://open.spotify.com/track/track1"
        );
        assert_eq!(resources.forecasts.len(), 2);
        assert_eq!(resources.new_post_messages.len(), 2);
    }

    #[test]
    fn test_song_links_follow_config() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), r#"{"a": "Sunny"}"#);
        let songs = SongsConfig {
            link_base: "https://music.example/t/".to_string(),
            fallback: "house".to_string(),
        };

        let resources = Resources::load(dir.path(), &songs).unwrap();
        assert_eq!(
            resources.easter_eggs.link_for("sasha"),
            "https://music.example/t/track1"
        );
        assert_eq!(
            resources.easter_eggs.link_for("nobody"),
            "https://music.example/t/house"
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Resources::load(dir.path(), &SongsConfig::default()).unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }

    #[test]
    fn test_empty_pool() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), "{}");
        let err = Resources::load(dir.path(), &SongsConfig::default()).unwrap_err();
        assert!(matches!(err, ResourceError::Empty(_)));
    }

    #[test]
    fn test_bad_flavor_table() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), r#"{"a": "Sunny"}"#);
        std::fs::write(
            dir.path().join(CRITICAL_RESPONSES_FILE),
            r#"{"success": [], "failure": ["x"]}"#,
        )
        .unwrap();
        let err = Resources::load(dir.path(), &SongsConfig::default()).unwrap_err();
        assert!(matches!(err, ResourceError::Json { .. }));
    }
}
