//! Infrastructure layer: concrete implementations of the domain interfaces
//! and the wire DTOs.

pub mod connection_registry;
pub mod dictionary;
pub mod dto;
pub mod message_pusher;
pub mod repository;
