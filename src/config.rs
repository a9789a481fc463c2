use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::lookup::fetch::DEFAULT_DICTIONARY_URL;

pub const SPEECH_ENGINE_KEYS: &[&str] = &["auto", "espeak-ng", "espeak", "say", "spd-say", "none"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Engine-specific voice handle; engine default when unset.
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_speech_engine")]
    pub speech_engine: String,
    #[serde(default = "default_dictionary_url")]
    pub dictionary_url: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    #[serde(default = "default_lookups_enabled")]
    pub lookups_enabled: bool,
    #[serde(default)]
    pub words_file: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_word_count() -> usize {
    10
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en-US".to_string()
}
fn default_speech_engine() -> String {
    "auto".to_string()
}
fn default_dictionary_url() -> String {
    DEFAULT_DICTIONARY_URL.to_string()
}
fn default_lookup_timeout_secs() -> u64 {
    10
}
fn default_lookups_enabled() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_count: default_word_count(),
            theme: default_theme(),
            locale: default_locale(),
            voice: None,
            speech_engine: default_speech_engine(),
            dictionary_url: default_dictionary_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            lookups_enabled: default_lookups_enabled(),
            words_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spellbee")
            .join("config.toml")
    }

    /// Clamp and normalize values from hand-edited or stale config files.
    pub fn validate(&mut self) {
        self.lookup_timeout_secs = self.lookup_timeout_secs.clamp(1, 60);
        if !SPEECH_ENGINE_KEYS.contains(&self.speech_engine.as_str()) {
            self.speech_engine = default_speech_engine();
        }
        if self.locale.trim().is_empty() {
            self.locale = default_locale();
        }
        if self.dictionary_url.trim().is_empty() {
            self.dictionary_url = default_dictionary_url();
        }
        if self.voice.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.voice = None;
        }
    }
}
