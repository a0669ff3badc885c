//! Flavor text for critical rolls and the per-user natural-20 easter egg

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::roll::RandomSource;

/// Link prefix for easter-egg payloads
pub const DEFAULT_LINK_BASE: &str = "https://open.spotify.com/track/";

/// Payload used for users without their own entry
pub const DEFAULT_FALLBACK: &str = "7yU7FlMnnLHEnOVxMmQLCQ?si=3f3693f8cef847ef";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlavorError {
    #[error("flavor table has no {0} phrases")]
    Empty(&'static str),
}

/// Critical outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Critical {
    Success,
    Failure,
}

/// Phrases shown in front of a natural 20 or natural 1
///
/// Both lists are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FlavorPhrases")]
pub struct FlavorTable {
    success: Vec<String>,
    failure: Vec<String>,
}

/// Unvalidated on-disk shape of a [`FlavorTable`]
#[derive(Debug, Clone, Deserialize)]
pub struct FlavorPhrases {
    pub success: Vec<String>,
    pub failure: Vec<String>,
}

impl TryFrom<FlavorPhrases> for FlavorTable {
    type Error = FlavorError;

    fn try_from(raw: FlavorPhrases) -> Result<Self, Self::Error> {
        FlavorTable::new(raw.success, raw.failure)
    }
}

impl FlavorTable {
    pub fn new(success: Vec<String>, failure: Vec<String>) -> Result<Self, FlavorError> {
        if success.is_empty() {
            return Err(FlavorError::Empty("success"));
        }
        if failure.is_empty() {
            return Err(FlavorError::Empty("failure"));
        }
        Ok(Self { success, failure })
    }

    pub fn phrases(&self, critical: Critical) -> &[String] {
        match critical {
            Critical::Success => &self.success,
            Critical::Failure => &self.failure,
        }
    }

    /// Pick one phrase for the given category
    pub fn choose(&self, critical: Critical, rng: &mut impl RandomSource) -> &str {
        let phrases = self.phrases(critical);
        &phrases[rng.pick(phrases.len())]
    }
}

/// Per-user payloads revealed on a natural 20
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EasterEggs {
    entries: HashMap<String, String>,
    fallback: String,
    link_base: String,
}

impl EasterEggs {
    /// Table with the default link base and fallback payload
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            fallback: DEFAULT_FALLBACK.to_string(),
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    /// Link for `user`, falling back to the shared payload
    pub fn link_for(&self, user: &str) -> String {
        let payload = self.entries.get(user).unwrap_or(&self.fallback);
        format!("{}{}", self.link_base, payload)
    }
}

impl Default for EasterEggs {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}
