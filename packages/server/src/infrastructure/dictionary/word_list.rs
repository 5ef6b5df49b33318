//! Newline-separated word lists.
//!
//! The same list serves as the dictionary oracle for guesses and as the base
//! answer pool. A built-in list ships with the binary; `--dictionary` replaces
//! it with a file.

use std::{collections::HashSet, fs, path::Path};

use thiserror::Error;

use crate::domain::{Dictionary, WordPool};

const BUILTIN_WORDS: &str = include_str!("../../../assets/words.txt");

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read word list '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Word list '{0}' contains no words")]
    Empty(String),
}

#[derive(Debug, Clone)]
pub struct WordListDictionary {
    words: HashSet<String>,
}

impl WordListDictionary {
    /// Parse a word list: one word per line, `#` starts a comment line.
    pub fn parse(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::parse(BUILTIN_WORDS)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dictionary = Self::parse(&contents);
        if dictionary.is_empty() {
            return Err(DictionaryError::Empty(path.display().to_string()));
        }
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Base answer pool built from the same words
    pub fn word_pool(&self) -> WordPool {
        let mut words: Vec<&String> = self.words.iter().collect();
        words.sort();
        WordPool::new(words)
    }
}

impl Dictionary for WordListDictionary {
    fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}
