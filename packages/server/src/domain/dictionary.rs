//! Dictionary membership oracle.

/// Answers whether a lowercase word is an accepted guess.
///
/// Implementations must be cheap and synchronous; the engine calls this while
/// holding the session lock.
#[cfg_attr(test, mockall::automock)]
pub trait Dictionary: Send + Sync {
    fn is_valid_word(&self, word: &str) -> bool;
}
