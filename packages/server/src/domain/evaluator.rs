//! Guess evaluation.
//!
//! Pure functions that compute per-letter feedback for a guess and fold the
//! feedback of several rows into the best-known state per letter (the
//! on-screen keyboard colouring).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-letter feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    /// Unrevealed tile
    Empty,
    Absent,
    Present,
    Correct,
}

impl TileState {
    /// Priority used when aggregating: correct > present > absent > empty
    fn rank(self) -> u8 {
        match self {
            TileState::Empty => 0,
            TileState::Absent => 1,
            TileState::Present => 2,
            TileState::Correct => 3,
        }
    }
}

/// Evaluate `guess` against `answer`.
///
/// Both words are expected to be lowercase and of equal length.
///
/// The first pass marks exact matches and consumes those answer letters; the
/// second pass marks `Present` only while an unconsumed occurrence of the
/// letter remains. A letter is therefore never marked `Correct` or `Present`
/// more times than it occurs in the answer.
pub fn evaluate(guess: &str, answer: &str) -> Vec<TileState> {
    let guess: Vec<char> = guess.chars().collect();
    let mut remaining: Vec<Option<char>> = answer.chars().map(Some).collect();
    let mut result = vec![TileState::Absent; guess.len()];

    for (i, ch) in guess.iter().enumerate() {
        if remaining.get(i).copied().flatten() == Some(*ch) {
            result[i] = TileState::Correct;
            remaining[i] = None;
        }
    }

    for (i, ch) in guess.iter().enumerate() {
        if result[i] == TileState::Correct {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(*ch)) {
            result[i] = TileState::Present;
            *slot = None;
        }
    }

    result
}

/// Whether every tile of a revealed row is `Correct`
pub fn is_solved(states: &[TileState]) -> bool {
    !states.is_empty() && states.iter().all(|s| *s == TileState::Correct)
}

/// Fold revealed rows into the best-known state per letter.
///
/// Rows whose word is empty are unrevealed and skipped.
pub fn aggregate_letter_states<'a, I>(rows: I) -> BTreeMap<char, TileState>
where
    I: IntoIterator<Item = (&'a str, &'a [TileState])>,
{
    let mut letters = BTreeMap::new();
    for (word, states) in rows {
        if word.is_empty() {
            continue;
        }
        for (ch, state) in word.chars().zip(states.iter().copied()) {
            letters
                .entry(ch)
                .and_modify(|best: &mut TileState| {
                    if state.rank() > best.rank() {
                        *best = state;
                    }
                })
                .or_insert(state);
        }
    }
    letters
}
