//! Kotoba game server library.
//!
//! An authoritative server for a multiplayer word-guessing game with solo
//! and two-player duel sessions, served over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
