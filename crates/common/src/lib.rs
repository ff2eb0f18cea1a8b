//! Shared types, config, storage, and error definitions for winevino.

pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use config::CatalogConfig;
pub use error::Error;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
