//! Part-of-speech tagging seam.
//!
//! Tagging is an external concern: callers construct a [`Tagger`] and pass it
//! to whichever component needs tokens. [`LexiconTagger`] is a small
//! dictionary-backed implementation for offline use.

use crate::error::AnalyticsError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Word pattern: letters, digits, and in-word apostrophes or hyphens.
const WORD_PATTERN: &str = r"[\p{L}\p{N}]+(?:['’-][\p{L}\p{N}]+)*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Other,
}

/// A classified word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
}

/// Trait that all taggers must implement.
pub trait Tagger: Send + Sync {
    /// Split `text` into words and classify each one.
    fn tag(&self, text: &str) -> Vec<Token>;
}

/// Tagger that looks words up in a fixed lexicon (case-insensitive).
pub struct LexiconTagger {
    lexicon: HashMap<String, PartOfSpeech>,
    words: Regex,
}

impl LexiconTagger {
    pub fn new(lexicon: HashMap<String, PartOfSpeech>) -> Self {
        let lexicon = lexicon
            .into_iter()
            .map(|(word, pos)| (word.to_lowercase(), pos))
            .collect();
        Self {
            lexicon,
            words: Regex::new(WORD_PATTERN).expect("word pattern is valid"),
        }
    }

    /// Load a lexicon from a JSON object mapping words to `noun`/`verb`/`other`.
    pub fn load_from(path: &Path) -> Result<Self, AnalyticsError> {
        let json = std::fs::read_to_string(path)?;
        let lexicon: HashMap<String, PartOfSpeech> = serde_json::from_str(&json)?;
        tracing::debug!("Loaded lexicon with {} entries", lexicon.len());
        Ok(Self::new(lexicon))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<Token> {
        self.words
            .find_iter(text)
            .map(|m| {
                let word = m.as_str();
                let pos = self
                    .lexicon
                    .get(&word.to_lowercase())
                    .copied()
                    .unwrap_or(PartOfSpeech::Other);
                Token {
                    text: word.to_string(),
                    pos,
                }
            })
            .collect()
    }
}
