//! Connection ↔ player mapping implementations.

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
