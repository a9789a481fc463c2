use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

const WORDS_EN: &str = include_str!("../../assets/words-en.json");

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("failed to read word list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {} is not a valid JSON array of strings: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The words sampled for one session, in presentation order from the back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PracticeSet {
    words: Vec<String>,
}

impl PracticeSet {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// The bundled English list.
    pub fn load() -> Self {
        let words: Vec<String> = serde_json::from_str(WORDS_EN).unwrap_or_default();
        Self::from_words(words)
    }

    /// Load a user word list. JSON arrays are accepted when the file starts
    /// with `[`; anything else is read as one word per line, skipping blank
    /// lines and `#` comments.
    pub fn from_file(path: &Path) -> Result<Self, WordBankError> {
        let content = fs::read_to_string(path).map_err(|source| WordBankError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim_start().starts_with('[') {
            let words: Vec<String> =
                serde_json::from_str(&content).map_err(|source| WordBankError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            return Ok(Self::from_words(words));
        }

        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(Self::from_words(words))
    }

    pub fn from_words(words: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draw `min(n, len)` distinct words in uniformly random order.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> PracticeSet {
        let n = n.min(self.words.len());
        if n == 0 {
            return PracticeSet::default();
        }
        let mut words: Vec<String> = self.words.choose_multiple(rng, n).cloned().collect();
        // choose_multiple does not guarantee a shuffled order
        words.shuffle(rng);
        PracticeSet::new(words)
    }
}

/// Parse a requested word count, clamping into `[0, bank_size]`.
/// Non-numeric and negative input yield zero; fractions truncate.
pub fn clamp_word_count(raw: &str, bank_size: usize) -> usize {
    let raw = raw.trim();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
        return 0;
    }
    // Only overflow can fail here, and that is larger than any bank
    whole.parse::<usize>().unwrap_or(usize::MAX).min(bank_size)
}
