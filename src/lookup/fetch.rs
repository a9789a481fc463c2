use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::lookup::DefinitionLookup;
use crate::lookup::definition::{Definition, parse_entries};

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, Error)]
pub enum LookupError {
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dictionary responded with HTTP {0}")]
    Status(u16),
    #[error("cannot build a lookup url from {0:?}")]
    Url(String),
    #[error("network support is disabled")]
    Offline,
}

/// Blocking client for a dictionaryapi.dev-compatible endpoint.
pub struct DictionaryClient {
    base_url: String,
    #[cfg(feature = "network")]
    http: reqwest::blocking::Client,
}

impl DictionaryClient {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spellbee/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: Duration) -> Result<Self, LookupError> {
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(feature = "network")]
    fn fetch(&self, word: &str) -> Result<String, LookupError> {
        let url = entry_url(&self.base_url, word)?;
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }

    #[cfg(not(feature = "network"))]
    fn fetch(&self, _word: &str) -> Result<String, LookupError> {
        Err(LookupError::Offline)
    }
}

impl DefinitionLookup for DictionaryClient {
    fn lookup(&self, word: &str) -> Definition {
        match self.fetch(word) {
            Ok(body) => {
                let definition = parse_entries(&body);
                debug!(word, found = definition.is_available(), "definition lookup done");
                definition
            }
            Err(err) => {
                warn!(word, %err, "definition lookup failed");
                Definition::unavailable()
            }
        }
    }
}

/// Used when lookups are switched off; always answers `N/A`.
pub struct OfflineLookup;

impl DefinitionLookup for OfflineLookup {
    fn lookup(&self, _word: &str) -> Definition {
        Definition::unavailable()
    }
}

/// Append `word` as a single, percent-encoded path segment of `base`.
#[cfg(feature = "network")]
pub fn entry_url(base: &str, word: &str) -> Result<reqwest::Url, LookupError> {
    let mut url = reqwest::Url::parse(base).map_err(|_| LookupError::Url(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| LookupError::Url(base.to_string()))?
        .pop_if_empty()
        .push(word);
    Ok(url)
}
