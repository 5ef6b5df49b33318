//! Word list backed dictionary.

pub mod word_list;

pub use word_list::{DictionaryError, WordListDictionary};
