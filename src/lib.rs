//! # Aerial Studio - website backend for an aerial-gymnastics studio
//!
//! Serves a single landing page and persists four record kinds in SQLite:
//! - news(id, name, text)
//! - service(id, name, description, price, img)
//! - clients(id, name, email, phone)
//! - reviews(id, name, text, img)
//!
//! The storage layer exposes three table-agnostic row operations
//! (upsert, delete, select) constrained to an allow-list of tables and
//! columns, plus typed repositories built on top of them.

pub mod storage;
pub mod records;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use storage::{SqliteStore, Table, Row, UpsertOutcome, DbStats};
pub use records::{Record, NewsItem, Service, Client, Review};
pub use rusqlite::types::Value;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `InvalidArgument` error from anything printable
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Whether the error was caused by the caller rather than the store
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
