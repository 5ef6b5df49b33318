//! Answer selection for new sessions.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom};

use super::GameConfig;

/// Answer used when no candidate word qualifies
pub const FALLBACK_ANSWER: &str = "apple";

/// Base pool of candidate answers
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Candidates for `config`: the base pool united with the config's extra
    /// pool, restricted to words of the configured length.
    pub fn candidates(&self, config: &GameConfig) -> Vec<String> {
        let extra = config.extra_word_pool().unwrap_or_default();
        self.words
            .iter()
            .chain(extra.iter())
            .filter(|w| w.chars().count() == config.word_length())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pick an answer uniformly at random, or [`FALLBACK_ANSWER`] when no
    /// candidate qualifies.
    pub fn pick_answer<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> String {
        self.candidates(config)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
    }
}
