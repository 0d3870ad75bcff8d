//! Plain-text vocabulary: line `i` is the label of node `i`.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Bidirectional mapping between node ids and word labels.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Builds a vocabulary from labels in node id order. Later duplicates do not
    /// replace the id of the first occurrence.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(words.len());
        for (id, word) in words.iter().enumerate() {
            index.entry(word.clone()).or_insert(id as u32);
        }
        Self { words, index }
    }

    /// Parses one label per line; surrounding whitespace is trimmed.
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines().map(str::trim))
    }

    /// Reads a vocabulary file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Label for `id`.
    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Node id for `word`.
    pub fn id(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    /// Resolves a token that is either a known word or a numeric node id in range.
    pub fn resolve(&self, token: &str) -> Option<u32> {
        if let Some(id) = self.id(token) {
            return Some(id);
        }
        token
            .parse::<u32>()
            .ok()
            .filter(|&id| (id as usize) < self.words.len())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let vocab = Vocabulary::parse("king\nqueen \nprince\nking\n");
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.word(1), Some("queen"));
        assert_eq!(vocab.id("queen"), Some(1));
        assert_eq!(vocab.id("king"), Some(0));
        assert_eq!(vocab.word(9), None);
    }

    #[test]
    fn test_resolve_word_or_index() {
        let vocab = Vocabulary::from_words(["cat", "dog", "7"]);
        assert_eq!(vocab.resolve("dog"), Some(1));
        assert_eq!(vocab.resolve("2"), Some(2));
        assert_eq!(vocab.resolve("7"), Some(2)); // word match wins
        assert_eq!(vocab.resolve("5"), None);
        assert_eq!(vocab.resolve("bird"), None);
    }
}
