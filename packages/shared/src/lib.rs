//! Utilities shared between the Kotoba server binary and its library.

pub mod logger;
pub mod time;
